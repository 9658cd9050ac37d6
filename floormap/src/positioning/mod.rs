//! Indoor/outdoor positioning session.
//!
//! This module holds the client side of an indoor positioning session: it
//! turns coarse device fixes into a building, keeps exactly one positioning
//! subscription alive for that building, and folds indoor/outdoor updates
//! back into session state.
//!
//! # Architecture
//!
//! ```text
//! LocationSource ──► resolver ──► PositioningSessionManager ──► SessionSnapshot
//!                                   ▲            │                    │
//!                  SubscriptionEvent│            │start/stop          ▼
//!                                   └── PositioningService     OverlayProjector
//! ```
//!
//! # Components
//!
//! - [`resolver`] - nearest building by great-circle distance
//! - [`PositioningSessionManager`] - subscription lifecycle and building state
//! - [`SessionRunner`] - event loop wiring sources, manager and map surface
//! - [`PositioningService`] / [`LocationSource`] - external service seams
//!
//! # Usage
//!
//! ```ignore
//! use floormap::positioning::{SessionRunner, SessionRunnerConfig};
//!
//! let runner = SessionRunner::new(service, location, surface, SessionRunnerConfig::default(), cancel);
//! let handle = runner.start();
//! ```

mod building;
mod error;
pub mod resolver;
mod runner;
mod service;
mod session;
mod state;

pub use building::{Building, BuildingBounds, Dimensions, Floor};
pub use error::{
    BuildingFetchError, FloorFetchError, LocationError, PositioningError, SessionError,
};
pub use resolver::{nearest_with_distance, resolve_nearest};
pub use runner::{
    SessionRunner, SessionRunnerConfig, DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_INITIAL_REGION,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use service::{
    LocationEvent, LocationSource, LocationWatchOptions, PositioningEvent, PositioningRequest,
    PositioningService, PositioningUpdate, SubscriptionEvent, SubscriptionHandle, WatchId,
};
pub use session::{PositioningSessionManager, Transition};
pub use state::{Fix, FixSource, SessionPhase, SessionSnapshot};
