//! Pure projection of session state into overlay state.

use crate::geo::LatLon;
use crate::positioning::{BuildingBounds, Dimensions, Fix, Floor, SessionSnapshot};

use super::surface::{MapRegion, Marker, MarkerKind, OverlayDraw, OVERLAY_ANCHOR, OVERLAY_Z_INDEX};

/// Default latitude/longitude span of a building region.
pub const DEFAULT_REGION_DELTA: f64 = 0.005;

/// Ground overlay corners as `[[lat, lon], [lat, lon]]`.
///
/// Built from building bounds as `[[NE.lat, SW.lon], [SW.lat, NE.lon]]`,
/// i.e. the north-west and south-east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayBounds(pub [[f64; 2]; 2]);

impl From<&BuildingBounds> for OverlayBounds {
    fn from(bounds: &BuildingBounds) -> Self {
        let ne = bounds.north_east;
        let sw = bounds.south_west;
        Self([[ne.latitude, sw.longitude], [sw.latitude, ne.longitude]])
    }
}

/// Everything the map needs to render one session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayState {
    /// Live indoor position if any, else the coarse location.
    pub camera_target: Option<LatLon>,
    /// Map image of the active floor.
    pub image_url: Option<String>,
    pub bounds: Option<OverlayBounds>,
    /// Building rotation in degrees.
    pub rotation: Option<f64>,
    pub size: Option<Dimensions>,
    /// Building region, used as the overlay location.
    pub region: Option<MapRegion>,
    pub markers: Vec<Marker>,
}

impl OverlayState {
    /// Full overlay draw request, if there is an image to show.
    pub fn overlay_draw(&self) -> Option<OverlayDraw> {
        let image = self.image_url.as_ref()?;
        let bounds = self.bounds?;
        let region = self.region?;
        let size = self.size?;

        Some(OverlayDraw {
            image: image.clone(),
            bounds,
            location: region.center,
            bearing: self.rotation.unwrap_or(0.0),
            anchor: OVERLAY_ANCHOR,
            width: size.width,
            height: size.height,
            z_index: OVERLAY_Z_INDEX,
        })
    }
}

/// Projects [`SessionSnapshot`]s into [`OverlayState`]s.
#[derive(Debug, Clone, Copy)]
pub struct OverlayProjector {
    region_delta: f64,
}

impl Default for OverlayProjector {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_DELTA)
    }
}

impl OverlayProjector {
    /// Create a projector using `region_delta` for building regions.
    pub fn new(region_delta: f64) -> Self {
        Self { region_delta }
    }

    /// Derive overlay state from a snapshot.
    pub fn project(&self, snapshot: &SessionSnapshot) -> OverlayState {
        let camera_target = snapshot
            .position
            .as_ref()
            .or(snapshot.location.as_ref())
            .map(Fix::position);

        let image_url =
            floor_image_url(snapshot.floors.as_deref(), snapshot.floor_id.as_deref()).map(String::from);

        let building = snapshot.building.as_ref();

        OverlayState {
            camera_target,
            image_url,
            bounds: building.map(|b| OverlayBounds::from(&b.bounds)),
            rotation: building.map(|b| b.rotation_degrees()),
            size: building.map(|b| b.dimensions),
            region: building.map(|b| MapRegion::square(b.center, self.region_delta)),
            markers: markers(snapshot),
        }
    }
}

/// Map URL of the floor whose id equals `floor_id`.
///
/// `None` without an active floor id, even when floors are known.
pub fn floor_image_url<'a>(floors: Option<&'a [Floor]>, floor_id: Option<&str>) -> Option<&'a str> {
    let floor_id = floor_id?;
    floors?
        .iter()
        .find(|floor| floor.id == floor_id)
        .map(|floor| floor.map_url.as_str())
}

fn markers(snapshot: &SessionSnapshot) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(1);

    match (&snapshot.position, &snapshot.location) {
        (Some(position), _) => markers.push(marker(MarkerKind::IndoorPosition, position)),
        (None, Some(location)) => markers.push(marker(MarkerKind::CoarseLocation, location)),
        (None, None) => {}
    }

    markers
}

fn marker(kind: MarkerKind, fix: &Fix) -> Marker {
    Marker {
        kind,
        coordinate: fix.position(),
        rotation: fix.bearing,
        anchor: OVERLAY_ANCHOR,
        flat: true,
    }
}
