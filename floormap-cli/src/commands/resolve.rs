//! Resolve command: nearest building to a coordinate.

use std::path::Path;

use floormap::geo::LatLon;
use floormap::positioning::{nearest_with_distance, Building};
use floormap::simulation::Scenario;

use crate::error::CliError;

/// Load the building catalogue from a scenario file and print the building
/// nearest to `(lat, lon)`.
pub fn run(buildings: &Path, lat: f64, lon: f64) -> Result<(), CliError> {
    let point = LatLon::try_new(lat, lon).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let scenario = Scenario::load(buildings)?;

    match nearest(&scenario.buildings, point) {
        Some(line) => println!("{}", line),
        None => println!("No buildings in {}", buildings.display()),
    }

    Ok(())
}

fn nearest(buildings: &[Building], point: LatLon) -> Option<String> {
    let (building, distance) = nearest_with_distance(point, buildings)?;

    tracing::info!(
        building_id = %building.id,
        distance_m = format!("{:.1}", distance),
        "Resolved nearest building"
    );

    let name = if building.name.is_empty() {
        "(unnamed)"
    } else {
        building.name.as_str()
    };
    Some(format!("{}  {}  {:.1} m", building.id, name, distance))
}
