//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use floormap::config::ConfigFileError;
use floormap::positioning::{LocationError, SessionError};
use floormap::simulation::ScenarioError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Scenario file could not be loaded
    Scenario(ScenarioError),
    /// The positioning session failed to start
    Session(SessionError),
    /// Invalid command-line input
    InvalidArgument(String),
    /// Async runtime failure
    Runtime(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Scenario(ScenarioError::Parse(_)) => {
                eprintln!();
                eprintln!("Scenario files are JSON with these top-level fields:");
                eprintln!("  name       Display name (optional)");
                eprintln!("  buildings  Buildings with id, center, bounds, rotation, dimensions");
                eprintln!("  floors     Floors with id, building_id, level, map_url");
                eprintln!("  steps      Events tagged by \"type\" (location, indoor, outdoor, ...)");
            }
            CliError::Session(SessionError::Location(LocationError::PermissionDenied)) => {
                eprintln!();
                eprintln!("Location permission was denied; the session cannot observe the device.");
            }
            CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value with 'floormap config set <section.key> <value>'");
                eprintln!("or edit the file shown by 'floormap config path'.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Scenario(e) => write!(f, "Failed to load scenario: {}", e),
            CliError::Session(e) => write!(f, "Positioning session failed: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Scenario(e) => Some(e),
            CliError::Session(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ScenarioError> for CliError {
    fn from(e: ScenarioError) -> Self {
        CliError::Scenario(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = CliError::Config("bad key".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad key");

        let err = CliError::from(SessionError::from(LocationError::PermissionDenied));
        assert_eq!(
            err.to_string(),
            "Positioning session failed: Location permission denied"
        );
    }

    #[test]
    fn test_source_is_wrapped_error() {
        use std::error::Error;

        let err = CliError::from(SessionError::from(LocationError::Timeout));
        assert!(err.source().is_some());
        assert!(CliError::Runtime("x".to_string()).source().is_none());
    }
}
