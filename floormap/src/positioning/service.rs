//! External collaborator interfaces.
//!
//! The positioning SDK and the device location service are opaque to this
//! crate. These traits describe exactly what the session consumes from them:
//!
//! - [`PositioningService`] - building/floor lookup and live indoor subscriptions
//! - [`LocationSource`] - coarse device geolocation push stream
//!
//! Both push their events into `mpsc` channels owned by the session runner,
//! so callbacks from the collaborators never touch session state directly.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

use super::building::{Building, Floor};
use super::error::{BuildingFetchError, FloorFetchError, LocationError, PositioningError};
use super::state::Fix;

/// Opaque handle to a live positioning subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameters for starting a positioning subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositioningRequest {
    /// Building the subscription is scoped to.
    pub building_id: String,
}

impl PositioningRequest {
    pub fn for_building(building: &Building) -> Self {
        Self {
            building_id: building.id.clone(),
        }
    }
}

/// Classified output of the positioning stream.
#[derive(Debug, Clone, PartialEq)]
pub enum PositioningUpdate {
    /// The device is inside the subscribed building.
    Indoor { fix: Fix, floor_id: String },
    /// The device left the building.
    Outdoor,
}

/// Everything a subscription can report.
#[derive(Debug, Clone, PartialEq)]
pub enum PositioningEvent {
    /// New indoor fix or outdoor classification.
    Update(PositioningUpdate),
    /// Informational status message from the SDK.
    Status(String),
    /// Subscription-level error.
    Error(PositioningError),
}

/// A positioning event tagged with the subscription that produced it.
///
/// The tag lets the session drop events still queued from a subscription
/// it has already stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEvent {
    pub subscription: SubscriptionHandle,
    pub event: PositioningEvent,
}

/// The indoor positioning SDK.
pub trait PositioningService: Send + Sync {
    /// Ask the platform for positioning permission. Fire-and-forget.
    fn request_authorization(&self);

    /// Fetch every building visible to this account.
    fn fetch_buildings(
        &self,
    ) -> impl Future<Output = Result<Vec<Building>, BuildingFetchError>> + Send;

    /// Fetch the floors of a building.
    fn fetch_floors(
        &self,
        building: &Building,
    ) -> impl Future<Output = Result<Vec<Floor>, FloorFetchError>> + Send;

    /// Start a subscription scoped to a building.
    ///
    /// Events must be sent to `events`, tagged with the returned handle.
    fn start_positioning(
        &self,
        request: PositioningRequest,
        events: mpsc::Sender<SubscriptionEvent>,
    ) -> impl Future<Output = Result<SubscriptionHandle, PositioningError>> + Send;

    /// Stop a subscription. Completes once the service confirms the stop.
    fn stop_positioning(
        &self,
        handle: SubscriptionHandle,
    ) -> impl Future<Output = Result<(), PositioningError>> + Send;
}

/// Identifier of a registered location watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchId(u64);

impl WatchId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Options for the device location watch.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationWatchOptions {
    /// Prefer GPS over network location.
    pub high_accuracy: bool,

    /// Minimum movement in meters before a new fix is emitted.
    pub distance_filter_m: f64,

    /// Desired interval between fixes.
    pub interval: Duration,

    /// Fastest interval the app can handle.
    pub fastest_interval: Duration,
}

impl Default for LocationWatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            distance_filter_m: 0.0,
            interval: Duration::from_millis(1000),
            fastest_interval: Duration::from_millis(500),
        }
    }
}

/// A coarse fix or a stream error.
pub type LocationEvent = Result<Fix, LocationError>;

/// The device location service.
pub trait LocationSource: Send + Sync {
    /// Register a watch; fixes and errors are pushed to `events`.
    fn watch_position(
        &self,
        options: LocationWatchOptions,
        events: mpsc::Sender<LocationEvent>,
    ) -> Result<WatchId, LocationError>;

    /// Remove a watch. Unknown ids are ignored.
    fn clear_watch(&self, id: WatchId);
}
