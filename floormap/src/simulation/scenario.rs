//! Scenario files.
//!
//! A scenario is a JSON document describing the buildings and floors a
//! simulated positioning service knows about, and an ordered list of steps
//! to play against a session:
//!
//! ```json
//! {
//!   "name": "walk-in",
//!   "buildings": [{ "id": "A", "center": { "latitude": 35.0, "longitude": 139.0 }, ... }],
//!   "floors": [{ "id": "F1", "building_id": "A", "map_url": "https://example/f1.png" }],
//!   "steps": [
//!     { "type": "location", "latitude": 35.01, "longitude": 139.0 },
//!     { "type": "indoor", "latitude": 35.0, "longitude": 139.0, "floor_id": "F1" },
//!     { "type": "outdoor" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::LatLon;
use crate::positioning::{Building, Floor};

/// Errors loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Building {id} is invalid: {reason}")]
    InvalidBuilding { id: String, reason: String },

    #[error("Duplicate building id: {0}")]
    DuplicateBuilding(String),

    #[error("Floor {floor_id} references unknown building {building_id}")]
    UnknownFloorBuilding {
        floor_id: String,
        building_id: String,
    },

    #[error("Step {index} is invalid: {reason}")]
    InvalidStep { index: usize, reason: String },
}

/// One scripted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Coarse device fix.
    Location {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        heading: f64,
        #[serde(default)]
        accuracy: Option<f64>,
    },

    /// Device location error.
    LocationError { message: String },

    /// Indoor fix for every live subscription.
    Indoor {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        bearing: f64,
        floor_id: String,
        #[serde(default)]
        accuracy: Option<f64>,
    },

    /// Outdoor classification for every live subscription.
    Outdoor,

    /// Status message for every live subscription.
    Status { message: String },

    /// Positioning error for every live subscription.
    Error { message: String },

    /// Pause playback.
    Wait { millis: u64 },
}

impl ScenarioStep {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Location { .. } => "location",
            ScenarioStep::LocationError { .. } => "location_error",
            ScenarioStep::Indoor { .. } => "indoor",
            ScenarioStep::Outdoor => "outdoor",
            ScenarioStep::Status { .. } => "status",
            ScenarioStep::Error { .. } => "error",
            ScenarioStep::Wait { .. } => "wait",
        }
    }

    fn coordinate(&self) -> Option<(f64, f64)> {
        match self {
            ScenarioStep::Location {
                latitude, longitude, ..
            }
            | ScenarioStep::Indoor {
                latitude, longitude, ..
            } => Some((*latitude, *longitude)),
            _ => None,
        }
    }
}

/// A scripted positioning session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub buildings: Vec<Building>,

    #[serde(default)]
    pub floors: Vec<Floor>,

    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_json(&content)?;

        tracing::debug!(
            path = %path.display(),
            name = %scenario.name,
            buildings = scenario.buildings.len(),
            floors = scenario.floors.len(),
            steps = scenario.steps.len(),
            "Scenario loaded"
        );

        Ok(scenario)
    }

    /// Parse and validate a scenario from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check coordinates, building ids and floor references.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut ids = HashSet::new();
        for building in &self.buildings {
            if building.id.is_empty() {
                return Err(ScenarioError::InvalidBuilding {
                    id: building.id.clone(),
                    reason: "empty id".to_string(),
                });
            }
            building
                .validate()
                .map_err(|e| ScenarioError::InvalidBuilding {
                    id: building.id.clone(),
                    reason: e.to_string(),
                })?;
            if !ids.insert(building.id.as_str()) {
                return Err(ScenarioError::DuplicateBuilding(building.id.clone()));
            }
        }

        for floor in &self.floors {
            if !ids.contains(floor.building_id.as_str()) {
                return Err(ScenarioError::UnknownFloorBuilding {
                    floor_id: floor.id.clone(),
                    building_id: floor.building_id.clone(),
                });
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            if let Some((lat, lon)) = step.coordinate() {
                LatLon::try_new(lat, lon).map_err(|e| ScenarioError::InvalidStep {
                    index,
                    reason: e.to_string(),
                })?;
            }
        }

        Ok(())
    }

    /// Floors belonging to `building_id`, in file order.
    pub fn floors_of<'a>(&'a self, building_id: &'a str) -> impl Iterator<Item = &'a Floor> + 'a {
        self.floors
            .iter()
            .filter(move |floor| floor.building_id == building_id)
    }
}
