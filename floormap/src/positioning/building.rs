//! Buildings and floors as reported by the positioning service.

use serde::{Deserialize, Serialize};

use crate::geo::{radians_to_degrees, GeoError, LatLon};

/// Geographic bounds of a building's floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingBounds {
    pub north_east: LatLon,
    pub south_west: LatLon,
}

/// Floor plan dimensions in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// A building known to the positioning service.
///
/// Buildings are resolved once per outdoor episode and replaced, never
/// mutated, when resolution runs again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Service-assigned identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Center used for nearest-building resolution.
    pub center: LatLon,

    /// Floor plan bounds.
    pub bounds: BuildingBounds,

    /// Floor plan rotation in radians.
    #[serde(default)]
    pub rotation: f64,

    /// Floor plan dimensions.
    pub dimensions: Dimensions,
}

impl Building {
    /// Floor plan rotation in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        radians_to_degrees(self.rotation)
    }

    /// Checks that the center and bound corners are valid coordinates.
    pub fn validate(&self) -> Result<(), GeoError> {
        self.center.validate()?;
        self.bounds.north_east.validate()?;
        self.bounds.south_west.validate()
    }
}

/// A floor of a building, with its floor plan image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// Service-assigned identifier, matched against indoor fixes.
    pub id: String,

    /// Building this floor belongs to.
    pub building_id: String,

    /// Floor level (0 = ground).
    #[serde(default)]
    pub level: i32,

    /// URL of the floor plan image.
    pub map_url: String,
}
