//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! Conversions into runtime types live next to the structs.

use std::path::PathBuf;
use std::time::Duration;

use crate::geo::LatLon;
use crate::overlay::MapRegion;
use crate::positioning::LocationWatchOptions;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Device location watch settings
    pub location: LocationSettings,
    /// Map camera and overlay settings
    pub map: MapSettings,
    /// Session event loop settings
    pub session: SessionSettings,
    /// Scenario playback settings
    pub simulation: SimulationSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Device location watch configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Request GPS-grade fixes.
    pub high_accuracy: bool,
    /// Minimum movement in meters between fixes (0 = every fix).
    pub distance_filter: f64,
    /// Desired interval between fixes in milliseconds.
    pub interval_ms: u64,
    /// Fastest accepted interval between fixes in milliseconds.
    pub fastest_interval_ms: u64,
}

impl LocationSettings {
    /// Options passed to the location source.
    pub fn watch_options(&self) -> LocationWatchOptions {
        LocationWatchOptions {
            high_accuracy: self.high_accuracy,
            distance_filter_m: self.distance_filter,
            interval: Duration::from_millis(self.interval_ms),
            fastest_interval: Duration::from_millis(self.fastest_interval_ms),
        }
    }
}

/// Map configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Latitude shown before the first fix.
    pub initial_latitude: f64,
    /// Longitude shown before the first fix.
    pub initial_longitude: f64,
    /// Latitude span of the initial region.
    pub initial_latitude_delta: f64,
    /// Longitude span of the initial region.
    pub initial_longitude_delta: f64,
    /// Latitude/longitude span of a building region.
    pub building_region_delta: f64,
}

impl MapSettings {
    /// Region shown at startup.
    pub fn initial_region(&self) -> MapRegion {
        MapRegion {
            center: LatLon::new(self.initial_latitude, self.initial_longitude),
            latitude_delta: self.initial_latitude_delta,
            longitude_delta: self.initial_longitude_delta,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Capacity of the location and positioning event channels.
    pub event_channel_capacity: usize,
}

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Pause between scenario steps in milliseconds.
    pub step_interval_ms: u64,
}

impl SimulationSettings {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
