//! `section.key` addressing for the config file.
//!
//! Used by `floormap config get/set/list`. Every key carries a value
//! specification that `set` checks before touching the [`ConfigFile`].

use std::str::FromStr;
use thiserror::Error;

use super::defaults::{MAX_EVENT_CHANNEL_CAPACITY, MIN_EVENT_CHANNEL_CAPACITY};
use super::parser::{expand_tilde, parse_bool};
use super::settings::ConfigFile;
use super::writer::path_to_string;
use crate::geo::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Errors from key lookup or value validation.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The value was rejected by the key's specification.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// A settable config value, one per field of [`ConfigFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Location settings
    LocationHighAccuracy,
    LocationDistanceFilter,
    LocationIntervalMs,
    LocationFastestIntervalMs,

    // Map settings
    MapInitialLatitude,
    MapInitialLongitude,
    MapInitialLatitudeDelta,
    MapInitialLongitudeDelta,
    MapBuildingRegionDelta,

    // Session settings
    SessionEventChannelCapacity,

    // Simulation settings
    SimulationStepIntervalMs,

    // Logging settings
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::LocationHighAccuracy,
            ConfigKey::LocationDistanceFilter,
            ConfigKey::LocationIntervalMs,
            ConfigKey::LocationFastestIntervalMs,
            ConfigKey::MapInitialLatitude,
            ConfigKey::MapInitialLongitude,
            ConfigKey::MapInitialLatitudeDelta,
            ConfigKey::MapInitialLongitudeDelta,
            ConfigKey::MapBuildingRegionDelta,
            ConfigKey::SessionEventChannelCapacity,
            ConfigKey::SimulationStepIntervalMs,
            ConfigKey::LoggingFile,
        ]
    }

    /// Get the canonical key name (e.g., "map.building_region_delta").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::LocationHighAccuracy => "location.high_accuracy",
            ConfigKey::LocationDistanceFilter => "location.distance_filter",
            ConfigKey::LocationIntervalMs => "location.interval_ms",
            ConfigKey::LocationFastestIntervalMs => "location.fastest_interval_ms",
            ConfigKey::MapInitialLatitude => "map.initial_latitude",
            ConfigKey::MapInitialLongitude => "map.initial_longitude",
            ConfigKey::MapInitialLatitudeDelta => "map.initial_latitude_delta",
            ConfigKey::MapInitialLongitudeDelta => "map.initial_longitude_delta",
            ConfigKey::MapBuildingRegionDelta => "map.building_region_delta",
            ConfigKey::SessionEventChannelCapacity => "session.event_channel_capacity",
            ConfigKey::SimulationStepIntervalMs => "simulation.step_interval_ms",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "map").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "building_region_delta").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Current value rendered the way the writer would.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::LocationHighAccuracy => config.location.high_accuracy.to_string(),
            ConfigKey::LocationDistanceFilter => config.location.distance_filter.to_string(),
            ConfigKey::LocationIntervalMs => config.location.interval_ms.to_string(),
            ConfigKey::LocationFastestIntervalMs => {
                config.location.fastest_interval_ms.to_string()
            }
            ConfigKey::MapInitialLatitude => config.map.initial_latitude.to_string(),
            ConfigKey::MapInitialLongitude => config.map.initial_longitude.to_string(),
            ConfigKey::MapInitialLatitudeDelta => config.map.initial_latitude_delta.to_string(),
            ConfigKey::MapInitialLongitudeDelta => config.map.initial_longitude_delta.to_string(),
            ConfigKey::MapBuildingRegionDelta => config.map.building_region_delta.to_string(),
            ConfigKey::SessionEventChannelCapacity => {
                config.session.event_channel_capacity.to_string()
            }
            ConfigKey::SimulationStepIntervalMs => config.simulation.step_interval_ms.to_string(),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Validate `value`, then store it. The config is untouched on error.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;

        let value = value.trim();
        match self {
            ConfigKey::LocationHighAccuracy => config.location.high_accuracy = parse_bool(value),
            ConfigKey::LocationDistanceFilter => {
                config.location.distance_filter = self.parse(value)?
            }
            ConfigKey::LocationIntervalMs => config.location.interval_ms = self.parse(value)?,
            ConfigKey::LocationFastestIntervalMs => {
                config.location.fastest_interval_ms = self.parse(value)?
            }
            ConfigKey::MapInitialLatitude => config.map.initial_latitude = self.parse(value)?,
            ConfigKey::MapInitialLongitude => config.map.initial_longitude = self.parse(value)?,
            ConfigKey::MapInitialLatitudeDelta => {
                config.map.initial_latitude_delta = self.parse(value)?
            }
            ConfigKey::MapInitialLongitudeDelta => {
                config.map.initial_longitude_delta = self.parse(value)?
            }
            ConfigKey::MapBuildingRegionDelta => {
                config.map.building_region_delta = self.parse(value)?
            }
            ConfigKey::SessionEventChannelCapacity => {
                config.session.event_channel_capacity = self.parse(value)?
            }
            ConfigKey::SimulationStepIntervalMs => {
                config.simulation.step_interval_ms = self.parse(value)?
            }
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
        Ok(())
    }

    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| self.failed(reason))
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigKeyError> {
        value
            .parse()
            .map_err(|_| self.failed(format!("cannot parse '{}'", value)))
    }

    fn failed(&self, reason: String) -> ConfigKeyError {
        ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        }
    }

    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::LocationHighAccuracy => Box::new(BooleanSpec),
            ConfigKey::LocationDistanceFilter => Box::new(NonNegativeNumberSpec),
            ConfigKey::LocationIntervalMs | ConfigKey::LocationFastestIntervalMs => {
                Box::new(PositiveIntegerSpec)
            }
            ConfigKey::MapInitialLatitude => Box::new(RangeSpec::new(MIN_LAT, MAX_LAT)),
            ConfigKey::MapInitialLongitude => Box::new(RangeSpec::new(MIN_LON, MAX_LON)),
            ConfigKey::MapInitialLatitudeDelta
            | ConfigKey::MapInitialLongitudeDelta
            | ConfigKey::MapBuildingRegionDelta => Box::new(PositiveNumberSpec),
            ConfigKey::SessionEventChannelCapacity => Box::new(IntegerRangeSpec::new(
                MIN_EVENT_CHANNEL_CAPACITY as u64,
                MAX_EVENT_CHANNEL_CAPACITY as u64,
            )),
            ConfigKey::SimulationStepIntervalMs => Box::new(NonNegativeIntegerSpec),
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }
}

// ============================================================================
// Value specifications
// ============================================================================

/// A rule a raw string value must satisfy. `Err` carries the reason.
trait ValueSpecification {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

struct BooleanSpec;

impl ValueSpecification for BooleanSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        let lower = value.to_lowercase();
        let valid = ["true", "false", "yes", "no", "1", "0", "on", "off"];
        if valid.contains(&lower.as_str()) {
            Ok(())
        } else {
            Err("must be true/false, yes/no, 1/0, or on/off".to_string())
        }
    }
}

/// Specification for integers greater than zero.
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer".to_string()),
        }
    }
}

/// Specification for integers including zero.
struct NonNegativeIntegerSpec;

impl ValueSpecification for NonNegativeIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| "must be a non-negative integer".to_string())
    }
}

/// Specification for integers within an inclusive range.
struct IntegerRangeSpec {
    min: u64,
    max: u64,
}

impl IntegerRangeSpec {
    fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }
}

impl ValueSpecification for IntegerRangeSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u64>() {
            Ok(n) if (self.min..=self.max).contains(&n) => Ok(()),
            _ => Err(format!(
                "must be an integer between {} and {}",
                self.min, self.max
            )),
        }
    }
}

/// Specification for numbers greater than zero.
struct PositiveNumberSpec;

impl ValueSpecification for PositiveNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n > 0.0 && n.is_finite() => Ok(()),
            _ => Err("must be a positive number".to_string()),
        }
    }
}

/// Specification for numbers including zero.
struct NonNegativeNumberSpec;

impl ValueSpecification for NonNegativeNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n >= 0.0 && n.is_finite() => Ok(()),
            _ => Err("must be zero or a positive number".to_string()),
        }
    }
}

/// Specification for numbers within an inclusive range.
struct RangeSpec {
    min: f64,
    max: f64,
}

impl RangeSpec {
    fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl ValueSpecification for RangeSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if (self.min..=self.max).contains(&n) => Ok(()),
            _ => Err(format!("must be between {} and {}", self.min, self.max)),
        }
    }
}

/// Non-empty path.
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}
