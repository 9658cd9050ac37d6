//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::{MAX_EVENT_CHANNEL_CAPACITY, MIN_EVENT_CHANNEL_CAPACITY};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::geo::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("high_accuracy") {
            config.location.high_accuracy = parse_bool(v);
        }
        if let Some(v) = section.get("distance_filter") {
            config.location.distance_filter = parse_number("location", "distance_filter", v)?;
            if config.location.distance_filter < 0.0 {
                return Err(invalid(
                    "location",
                    "distance_filter",
                    v,
                    "must not be negative (meters)",
                ));
            }
        }
        if let Some(v) = section.get("interval_ms") {
            config.location.interval_ms = parse_millis("location", "interval_ms", v)?;
        }
        if let Some(v) = section.get("fastest_interval_ms") {
            config.location.fastest_interval_ms =
                parse_millis("location", "fastest_interval_ms", v)?;
        }
        if config.location.fastest_interval_ms > config.location.interval_ms {
            return Err(invalid(
                "location",
                "fastest_interval_ms",
                &config.location.fastest_interval_ms.to_string(),
                "must not exceed interval_ms",
            ));
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("initial_latitude") {
            let lat = parse_number("map", "initial_latitude", v)?;
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(invalid(
                    "map",
                    "initial_latitude",
                    v,
                    "must be between -90 and 90",
                ));
            }
            config.map.initial_latitude = lat;
        }
        if let Some(v) = section.get("initial_longitude") {
            let lon = parse_number("map", "initial_longitude", v)?;
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(invalid(
                    "map",
                    "initial_longitude",
                    v,
                    "must be between -180 and 180",
                ));
            }
            config.map.initial_longitude = lon;
        }
        if let Some(v) = section.get("initial_latitude_delta") {
            config.map.initial_latitude_delta = parse_delta("initial_latitude_delta", v)?;
        }
        if let Some(v) = section.get("initial_longitude_delta") {
            config.map.initial_longitude_delta = parse_delta("initial_longitude_delta", v)?;
        }
        if let Some(v) = section.get("building_region_delta") {
            config.map.building_region_delta = parse_delta("building_region_delta", v)?;
        }
    }

    // [session] section
    if let Some(section) = ini.section(Some("session")) {
        if let Some(v) = section.get("event_channel_capacity") {
            let capacity: usize = v.trim().parse().map_err(|_| {
                invalid(
                    "session",
                    "event_channel_capacity",
                    v,
                    "must be a positive integer",
                )
            })?;
            if !(MIN_EVENT_CHANNEL_CAPACITY..=MAX_EVENT_CHANNEL_CAPACITY).contains(&capacity) {
                return Err(invalid(
                    "session",
                    "event_channel_capacity",
                    v,
                    "must be between 1 and 65536",
                ));
            }
            config.session.event_channel_capacity = capacity;
        }
    }

    // [simulation] section
    if let Some(section) = ini.section(Some("simulation")) {
        if let Some(v) = section.get("step_interval_ms") {
            config.simulation.step_interval_ms = v.trim().parse().map_err(|_| {
                invalid(
                    "simulation",
                    "step_interval_ms",
                    v,
                    "must be a non-negative integer (milliseconds)",
                )
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a number"))
}

fn parse_millis(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(invalid(
            section,
            key,
            value,
            "must be a positive integer (milliseconds)",
        )),
    }
}

fn parse_delta(key: &str, value: &str) -> Result<f64, ConfigFileError> {
    let delta: f64 = parse_number("map", key, value)?;
    if delta > 0.0 && delta.is_finite() {
        Ok(delta)
    } else {
        Err(invalid("map", key, value, "must be a positive number (degrees)"))
    }
}

/// Parse a boolean value, accepting true/false, yes/no, 1/0, on/off.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[location]
high_accuracy = false
distance_filter = 2.5
interval_ms = 2000
fastest_interval_ms = 1000

[map]
initial_latitude = 51.5
initial_longitude = -0.12
initial_latitude_delta = 0.1
initial_longitude_delta = 0.05
building_region_delta = 0.002

[session]
event_channel_capacity = 128

[simulation]
step_interval_ms = 50

[logging]
file = /tmp/floormap.log
"#,
        )
        .unwrap();

        assert!(!config.location.high_accuracy);
        assert_eq!(config.location.distance_filter, 2.5);
        assert_eq!(config.location.interval_ms, 2000);
        assert_eq!(config.location.fastest_interval_ms, 1000);
        assert_eq!(config.map.initial_latitude, 51.5);
        assert_eq!(config.map.initial_longitude, -0.12);
        assert_eq!(config.map.initial_latitude_delta, 0.1);
        assert_eq!(config.map.initial_longitude_delta, 0.05);
        assert_eq!(config.map.building_region_delta, 0.002);
        assert_eq!(config.session.event_channel_capacity, 128);
        assert_eq!(config.simulation.step_interval_ms, 50);
        assert_eq!(config.logging.file, PathBuf::from("/tmp/floormap.log"));
    }

    #[test]
    fn test_partial_config() {
        // Only specify some settings, rest should use defaults
        let config = load(
            r#"
[map]
building_region_delta = 0.01
"#,
        )
        .unwrap();

        assert_eq!(config.map.building_region_delta, 0.01);
        assert_eq!(config.map.initial_latitude, DEFAULT_INITIAL_LATITUDE);
        assert_eq!(config.location.interval_ms, DEFAULT_INTERVAL_MS);
        assert_eq!(
            config.session.event_channel_capacity,
            DEFAULT_EVENT_CHANNEL_CAPACITY
        );
    }

    #[test]
    fn test_invalid_latitude() {
        let err = load("[map]\ninitial_latitude = 91\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: map.initial_latitude = '91' - must be between -90 and 90"
        );
    }

    #[test]
    fn test_invalid_longitude() {
        let result = load("[map]\ninitial_longitude = east\n");
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "initial_longitude"
        ));
    }

    #[test]
    fn test_non_positive_delta_rejected() {
        assert!(load("[map]\nbuilding_region_delta = 0\n").is_err());
        assert!(load("[map]\ninitial_latitude_delta = -0.1\n").is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = load("[location]\ninterval_ms = 0\n");
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "interval_ms"
        ));
    }

    #[test]
    fn test_fastest_interval_must_not_exceed_interval() {
        let result = load("[location]\ninterval_ms = 500\nfastest_interval_ms = 1000\n");
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidValue { key, .. }) if key == "fastest_interval_ms"
        ));
    }

    #[test]
    fn test_negative_distance_filter_rejected() {
        assert!(load("[location]\ndistance_filter = -1\n").is_err());
    }

    #[test]
    fn test_channel_capacity_bounds() {
        assert!(load("[session]\nevent_channel_capacity = 0\n").is_err());
        assert!(load("[session]\nevent_channel_capacity = 100000\n").is_err());
        assert!(load("[session]\nevent_channel_capacity = 1\n").is_ok());
    }

    #[test]
    fn test_empty_log_file_keeps_default() {
        let config = load("[logging]\nfile =\n").unwrap();
        assert_eq!(config.logging.file, ConfigFile::default().logging.file);
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "TRUE", "yes", "1", "on", "  On "] {
            assert!(parse_bool(v), "{v} should be true");
        }
        for v in ["false", "no", "0", "off", "", "maybe"] {
            assert!(!parse_bool(v), "{v} should be false");
        }
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/logs/floormap.log");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs/floormap.log"));
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
