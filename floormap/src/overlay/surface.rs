//! Map surface abstraction.

use crate::geo::LatLon;

use super::projector::OverlayBounds;

/// Anchor used for markers and the floor overlay (image center).
pub const OVERLAY_ANCHOR: (f64, f64) = (0.5, 0.5);

/// Z-index of the floor overlay, above base map tiles.
pub const OVERLAY_Z_INDEX: i32 = 1000;

/// Visible map region: a center and the latitude/longitude span around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center: LatLon,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Region with the same delta on both axes.
    pub fn square(center: LatLon, delta: f64) -> Self {
        Self {
            center,
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }
}

/// Camera animation request.
///
/// Fields left as `None` keep the camera's current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRequest {
    pub center: LatLon,
    pub pitch: Option<f64>,
    pub heading: Option<f64>,
    pub altitude: Option<f64>,
    pub zoom: Option<f64>,
}

impl CameraRequest {
    /// Center on `center` with pitch, heading and altitude reset to 0.
    ///
    /// Used for coarse fixes; zoom is kept.
    pub fn recenter(center: LatLon) -> Self {
        Self {
            center,
            pitch: Some(0.0),
            heading: Some(0.0),
            altitude: Some(0.0),
            zoom: None,
        }
    }

    /// Move to `center`, keeping every other camera value.
    pub fn follow(center: LatLon) -> Self {
        Self {
            center,
            pitch: None,
            heading: None,
            altitude: None,
            zoom: None,
        }
    }
}

/// Which fix a marker shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Device geolocation fix.
    CoarseLocation,
    /// Indoor positioning fix.
    IndoorPosition,
}

impl MarkerKind {
    /// Icon asset name.
    pub fn icon(&self) -> &'static str {
        match self {
            MarkerKind::CoarseLocation => "arrow.png",
            MarkerKind::IndoorPosition => "arrow_indoor.png",
        }
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerKind::CoarseLocation => write!(f, "location"),
            MarkerKind::IndoorPosition => write!(f, "position"),
        }
    }
}

/// A flat, rotated map marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub coordinate: LatLon,
    /// Rotation in degrees clockwise from north.
    pub rotation: f64,
    pub anchor: (f64, f64),
    pub flat: bool,
}

/// Complete floor image overlay draw request.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDraw {
    pub image: String,
    pub bounds: OverlayBounds,
    /// Overlay anchor location (building region center).
    pub location: LatLon,
    /// Bearing in degrees.
    pub bearing: f64,
    pub anchor: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

/// Rendering surface driven by the session runner.
///
/// Calls are fire-and-forget; a surface has no way to report failures back
/// into the session.
pub trait MapSurface: Send {
    /// Show a region without animation.
    fn show_region(&mut self, region: &MapRegion);

    /// Animate the camera.
    fn animate_camera(&mut self, camera: &CameraRequest);

    /// Replace all markers.
    fn draw_markers(&mut self, markers: &[Marker]);

    /// Replace the floor overlay; `None` removes it.
    fn draw_overlay(&mut self, overlay: Option<&OverlayDraw>);
}

/// Surface that only logs.
///
/// Overlay changes are logged at info, everything else at debug.
#[derive(Debug, Default)]
pub struct TracingMapSurface {
    current_image: Option<String>,
}

impl TracingMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image URL of the overlay currently shown.
    pub fn current_image(&self) -> Option<&str> {
        self.current_image.as_deref()
    }
}

impl MapSurface for TracingMapSurface {
    fn show_region(&mut self, region: &MapRegion) {
        tracing::debug!(
            center = %region.center,
            lat_delta = region.latitude_delta,
            lon_delta = region.longitude_delta,
            "Show region"
        );
    }

    fn animate_camera(&mut self, camera: &CameraRequest) {
        tracing::debug!(
            center = %camera.center,
            pitch = ?camera.pitch,
            heading = ?camera.heading,
            altitude = ?camera.altitude,
            "Animate camera"
        );
    }

    fn draw_markers(&mut self, markers: &[Marker]) {
        for marker in markers {
            tracing::debug!(
                kind = %marker.kind,
                icon = marker.kind.icon(),
                coordinate = %marker.coordinate,
                rotation = format!("{:.1}", marker.rotation),
                "Draw marker"
            );
        }
    }

    fn draw_overlay(&mut self, overlay: Option<&OverlayDraw>) {
        let image = overlay.map(|o| o.image.clone());
        if image == self.current_image {
            return;
        }
        match overlay {
            Some(o) => tracing::info!(
                image = %o.image,
                location = %o.location,
                bearing = format!("{:.1}", o.bearing),
                width = o.width,
                height = o.height,
                "Floor overlay shown"
            ),
            None => tracing::info!("Floor overlay removed"),
        }
        self.current_image = image;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recenter_resets_orientation() {
        let camera = CameraRequest::recenter(LatLon::new(35.0, 139.0));
        assert_eq!(camera.pitch, Some(0.0));
        assert_eq!(camera.heading, Some(0.0));
        assert_eq!(camera.altitude, Some(0.0));
        assert_eq!(camera.zoom, None);
    }

    #[test]
    fn test_follow_keeps_everything() {
        let camera = CameraRequest::follow(LatLon::new(35.0, 139.0));
        assert_eq!(camera.center, LatLon::new(35.0, 139.0));
        assert!(camera.pitch.is_none());
        assert!(camera.heading.is_none());
        assert!(camera.altitude.is_none());
        assert!(camera.zoom.is_none());
    }

    #[test]
    fn test_marker_icons() {
        assert_eq!(MarkerKind::CoarseLocation.icon(), "arrow.png");
        assert_eq!(MarkerKind::IndoorPosition.icon(), "arrow_indoor.png");
    }

    #[test]
    fn test_tracing_surface_tracks_overlay() {
        let mut surface = TracingMapSurface::new();
        let draw = OverlayDraw {
            image: "u1".to_string(),
            bounds: OverlayBounds([[1.0, 2.0], [3.0, 4.0]]),
            location: LatLon::new(0.0, 0.0),
            bearing: 0.0,
            anchor: OVERLAY_ANCHOR,
            width: 10.0,
            height: 10.0,
            z_index: OVERLAY_Z_INDEX,
        };

        surface.draw_overlay(Some(&draw));
        assert_eq!(surface.current_image(), Some("u1"));

        surface.draw_overlay(None);
        assert_eq!(surface.current_image(), None);
    }
}
