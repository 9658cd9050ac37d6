//! Reading and writing `~/.floormap/config.ini`.
//!
//! A missing file means defaults. Values are validated by [`super::parser`]
//! on load and rendered with comments by [`super::writer`] on save.

use ini::Ini;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Config file name inside [`config_directory`].
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors reading, validating or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but is not valid INI
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file {}: {source}", path.display())]
    WriteError { path: PathBuf, source: io::Error },

    /// A value is present but out of range or malformed
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory {}: {source}", path.display())]
    DirectoryError { path: PathBuf, source: io::Error },
}

impl ConfigFile {
    /// Load from [`config_file_path`].
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ConfigFileError::DirectoryError {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, super::writer::to_config_string(self)).map_err(|source| {
            ConfigFileError::WriteError {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Write a default config file unless one is already there.
    ///
    /// Returns the file path and whether it was created.
    pub fn ensure_exists() -> Result<(PathBuf, bool), ConfigFileError> {
        let path = config_file_path();
        if path.exists() {
            return Ok((path, false));
        }
        Self::default().save_to(&path)?;
        Ok((path, true))
    }
}

/// `~/.floormap`, or `./.floormap` when there is no home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".floormap")
}

pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    #[test]
    fn test_save_reports_unwritable_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A directory where the file should be
        let config_path = temp_dir.path().join("taken");
        std::fs::create_dir(&config_path).unwrap();

        let err = ConfigFile::default().save_to(&config_path).unwrap_err();
        assert!(matches!(err, ConfigFileError::WriteError { .. }));
        assert!(err.to_string().contains("taken"));
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert!(config.location.high_accuracy);
        assert_eq!(config.location.interval_ms, DEFAULT_INTERVAL_MS);
        assert_eq!(config.location.fastest_interval_ms, DEFAULT_FASTEST_INTERVAL_MS);
        assert_eq!(config.map.building_region_delta, DEFAULT_BUILDING_REGION_DELTA);
        assert_eq!(config.simulation.step_interval_ms, DEFAULT_STEP_INTERVAL_MS);
        assert!(config.logging.file.ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.ini");

        assert_eq!(ConfigFile::load_from(&missing).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();

        assert!(config_path.exists());
    }

    #[test]
    fn test_config_paths() {
        assert!(config_directory().ends_with(".floormap"));
        assert!(config_file_path().ends_with(".floormap/config.ini"));
    }

    #[test]
    fn test_conversions() {
        let config = ConfigFile::default();

        let options = config.location.watch_options();
        assert!(options.high_accuracy);
        assert_eq!(options.interval.as_millis(), 1000);
        assert_eq!(options.fastest_interval.as_millis(), 500);

        let region = config.map.initial_region();
        assert_eq!(region.center.latitude, DEFAULT_INITIAL_LATITUDE);
        assert_eq!(region.latitude_delta, 0.0922);

        assert_eq!(config.simulation.step_interval().as_millis(), 500);
    }
}
