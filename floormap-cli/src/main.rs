//! FloorMap CLI - Command-line interface
//!
//! Drives the floormap positioning session against recorded scenarios and
//! manages its configuration file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "floormap")]
#[command(version, about = "Indoor/outdoor positioning session player", long_about = None)]
struct Cli {
    /// Enable debug-level logging regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    /// Mirror log output to stdout
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario file through a positioning session
    Run {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Pause between steps in milliseconds (overrides simulation.step_interval_ms)
        #[arg(long)]
        step_interval_ms: Option<u64>,
    },

    /// Print the building nearest to a coordinate
    Resolve {
        /// JSON file with a "buildings" list (scenario files work)
        #[arg(long)]
        buildings: PathBuf,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        e.exit();
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config(command) => commands::config::run(command),
        Commands::Resolve {
            buildings,
            lat,
            lon,
        } => {
            let runner = CliRunner::with_debug(cli.verbose, cli.debug)?;
            runner.log_startup("resolve");
            commands::resolve::run(&buildings, lat, lon)
        }
        Commands::Run {
            scenario,
            step_interval_ms,
        } => {
            let runner = CliRunner::with_debug(cli.verbose, cli.debug)?;
            runner.log_startup("run");
            commands::run::run(
                RunArgs {
                    scenario,
                    step_interval_ms,
                },
                runner.config(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "floormap",
            "resolve",
            "--buildings",
            "b.json",
            "--lat",
            "-33.8688",
            "--lon",
            "151.2093",
        ])
        .unwrap();

        match cli.command {
            Commands::Resolve { lat, lon, .. } => {
                assert_eq!(lat, -33.8688);
                assert_eq!(lon, 151.2093);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_parse_run_with_global_debug() {
        let cli = Cli::try_parse_from([
            "floormap",
            "run",
            "walk.json",
            "--step-interval-ms",
            "50",
            "--debug",
        ])
        .unwrap();

        assert!(cli.debug);
        assert!(!cli.verbose);
        match cli.command {
            Commands::Run {
                scenario,
                step_interval_ms,
            } => {
                assert_eq!(scenario, PathBuf::from("walk.json"));
                assert_eq!(step_interval_ms, Some(50));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_config_get() {
        let cli = Cli::try_parse_from(["floormap", "config", "get", "map.initial_latitude"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Get { key }) if key == "map.initial_latitude"
        ));
    }
}
