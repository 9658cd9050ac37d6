//! Configuration file for FloorMap.
//!
//! User settings live in `~/.floormap/config.ini`:
//!
//! ```ini
//! [location]
//! high_accuracy = true
//! interval_ms = 1000
//!
//! [map]
//! building_region_delta = 0.005
//! ```
//!
//! Missing files and keys fall back to the values in [`defaults`]. Every
//! value is validated on load; keys can be read and written individually
//! through [`ConfigKey`].
//!
//! # Example
//!
//! ```no_run
//! use floormap::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::load()?;
//! ConfigKey::MapBuildingRegionDelta.set(&mut config, "0.01")?;
//! config.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    ConfigFile, LocationSettings, LoggingSettings, MapSettings, SessionSettings,
    SimulationSettings,
};
