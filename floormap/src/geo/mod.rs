//! Geographic helpers
//!
//! Great-circle distance and angle conversions shared by building resolution
//! and overlay projection.

mod types;

pub use types::{GeoError, LatLon, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

use std::f64::consts::PI;

/// Equatorial Earth radius in meters (WGS84).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Calculate the great-circle distance between two points.
///
/// Uses the haversine formula, which is accurate for the short
/// building-to-device distances this crate deals with.
///
/// # Returns
///
/// Distance in meters.
///
/// # Example
///
/// ```
/// use floormap::geo::{distance_m, LatLon};
///
/// // One degree of latitude is roughly 111km
/// let dist = distance_m(LatLon::new(0.0, 0.0), LatLon::new(1.0, 0.0));
/// assert!((dist - 111_319.0).abs() < 100.0);
/// ```
pub fn distance_m(from: LatLon, to: LatLon) -> f64 {
    let lat1_rad = from.latitude * DEG_TO_RAD;
    let lat2_rad = to.latitude * DEG_TO_RAD;
    let delta_lat = (to.latitude - from.latitude) * DEG_TO_RAD;
    let delta_lon = (to.longitude - from.longitude) * DEG_TO_RAD;

    // Haversine formula
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Converts an angle in radians to degrees (`r * 180 / π`).
#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

#[cfg(test)]
mod tests;
