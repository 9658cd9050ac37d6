//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[location]
; Request GPS-grade fixes from the device (default: true)
high_accuracy = {}
; Minimum movement in meters before a new fix is reported (default: 0)
distance_filter = {}
; Desired interval between fixes in milliseconds (default: 1000)
interval_ms = {}
; Fastest interval the session accepts in milliseconds (default: 500)
; Must not exceed interval_ms
fastest_interval_ms = {}

[map]
; Region shown before the first fix (default: central Tokyo)
initial_latitude = {}
initial_longitude = {}
initial_latitude_delta = {}
initial_longitude_delta = {}
; Latitude/longitude span around a building center (default: 0.005)
building_region_delta = {}

[session]
; Capacity of the location and positioning event queues (default: 64)
event_channel_capacity = {}

[simulation]
; Pause between scenario steps in milliseconds (default: 500)
step_interval_ms = {}

[logging]
; Log file, truncated at the start of each session
file = {}
"#,
        config.location.high_accuracy,
        config.location.distance_filter,
        config.location.interval_ms,
        config.location.fastest_interval_ms,
        config.map.initial_latitude,
        config.map.initial_longitude,
        config.map.initial_latitude_delta,
        config.map.initial_longitude_delta,
        config.map.building_region_delta,
        config.session.event_channel_capacity,
        config.simulation.step_interval_ms,
        path_to_string(&config.logging.file),
    )
}

/// Convert a path to a string, collapsing the home directory to `~`.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
