//! Nearest-building resolution.
//!
//! Picks the building whose center is closest to a coarse fix by
//! great-circle distance. Pure: no I/O, no state.

use super::building::Building;
use super::state::Fix;
use crate::geo::{distance_m, LatLon};

/// Resolve the building nearest to a coarse fix.
///
/// Returns `None` for an empty candidate list. When two candidates are
/// equidistant the one appearing first wins.
///
/// # Example
///
/// ```ignore
/// let nearest = resolve_nearest(&fix, &buildings);
/// ```
pub fn resolve_nearest<'a>(location: &Fix, candidates: &'a [Building]) -> Option<&'a Building> {
    nearest_with_distance(location.position(), candidates).map(|(building, _)| building)
}

/// Nearest building to a point, together with its distance in meters.
pub fn nearest_with_distance(point: LatLon, candidates: &[Building]) -> Option<(&Building, f64)> {
    let mut nearest: Option<(&Building, f64)> = None;

    for building in candidates {
        let distance = distance_m(building.center, point);
        match nearest {
            // Strictly closer only, so earlier candidates keep ties
            Some((_, best)) if best <= distance => {}
            _ => nearest = Some((building, distance)),
        }
    }

    nearest
}
