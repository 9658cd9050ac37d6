//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::settings::*;

// =============================================================================
// Location
// =============================================================================

pub const DEFAULT_HIGH_ACCURACY: bool = true;
pub const DEFAULT_DISTANCE_FILTER: f64 = 0.0;
pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_FASTEST_INTERVAL_MS: u64 = 500;

// =============================================================================
// Map
// =============================================================================

/// Central Tokyo.
pub const DEFAULT_INITIAL_LATITUDE: f64 = 35.68547446159457;
pub const DEFAULT_INITIAL_LONGITUDE: f64 = 139.75297856553277;
pub const DEFAULT_INITIAL_LATITUDE_DELTA: f64 = 0.0922;
pub const DEFAULT_INITIAL_LONGITUDE_DELTA: f64 = 0.0421;
pub const DEFAULT_BUILDING_REGION_DELTA: f64 = 0.005;

// =============================================================================
// Session / simulation
// =============================================================================

pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity bounds; values outside are rejected.
pub const MIN_EVENT_CHANNEL_CAPACITY: usize = 1;
pub const MAX_EVENT_CHANNEL_CAPACITY: usize = 65_536;

pub const DEFAULT_STEP_INTERVAL_MS: u64 = 500;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "floormap.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            location: LocationSettings {
                high_accuracy: DEFAULT_HIGH_ACCURACY,
                distance_filter: DEFAULT_DISTANCE_FILTER,
                interval_ms: DEFAULT_INTERVAL_MS,
                fastest_interval_ms: DEFAULT_FASTEST_INTERVAL_MS,
            },
            map: MapSettings {
                initial_latitude: DEFAULT_INITIAL_LATITUDE,
                initial_longitude: DEFAULT_INITIAL_LONGITUDE,
                initial_latitude_delta: DEFAULT_INITIAL_LATITUDE_DELTA,
                initial_longitude_delta: DEFAULT_INITIAL_LONGITUDE_DELTA,
                building_region_delta: DEFAULT_BUILDING_REGION_DELTA,
            },
            session: SessionSettings {
                event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            },
            simulation: SimulationSettings {
                step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
