//! FloorMap - indoor/outdoor positioning session core
//!
//! This library keeps a map view in sync with an indoor positioning service:
//! it resolves the building nearest to the device, runs exactly one
//! positioning subscription for it, and projects indoor fixes into camera,
//! marker and floor plan overlay state.
//!
//! # High-Level API
//!
//! The [`positioning::SessionRunner`] wires everything together:
//!
//! ```ignore
//! use floormap::positioning::{SessionRunner, SessionRunnerConfig};
//! use floormap::overlay::TracingMapSurface;
//!
//! let runner = SessionRunner::new(
//!     service,
//!     location_source,
//!     TracingMapSurface::new(),
//!     SessionRunnerConfig::default(),
//!     cancellation.clone(),
//! );
//! let handle = runner.start();
//! ```
//!
//! The positioning SDK, device geolocation and map rendering are external;
//! they plug in through the [`positioning::PositioningService`],
//! [`positioning::LocationSource`] and [`overlay::MapSurface`] traits.
//! [`simulation`] provides scenario-driven implementations of the first two.

pub mod config;
pub mod geo;
pub mod logging;
pub mod overlay;
pub mod positioning;
pub mod simulation;

/// Version of the FloorMap library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
