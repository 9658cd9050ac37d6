//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`resolve`] - Nearest building to a coordinate
//! - [`run`] - Play a scenario through a positioning session

pub mod config;
pub mod resolve;
pub mod run;
