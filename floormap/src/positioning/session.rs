//! Positioning session state machine.
//!
//! The [`PositioningSessionManager`] owns the only two shared resources of a
//! session: the live subscription handle and the current building. It moves
//! between three phases:
//!
//! ```text
//!            coarse fix                 building resolved
//!   Idle ─────────────────► Resolving ─────────────────────► Active
//!    ▲                          │ none found                   │
//!    │◄─────────────────────────┘                              │
//!    │               outdoor classification                    │
//!    └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Guarantees
//!
//! - At most one live subscription. The previous one is stopped, and the stop
//!   awaited, before a replacement is started. Stop failures are logged and
//!   the replacement is started anyway.
//! - A building is acted on once per distinct id; re-resolving the building
//!   already being handled issues no fetch or subscribe calls.
//! - Events tagged with any handle other than the live one are dropped.
//! - Coarse fixes only trigger resolution while no indoor position is live.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::building::{Building, Floor};
use super::error::SessionError;
use super::resolver::nearest_with_distance;
use super::service::{
    PositioningEvent, PositioningRequest, PositioningService, PositioningUpdate,
    SubscriptionEvent, SubscriptionHandle,
};
use super::state::{Fix, SessionPhase, SessionSnapshot};

/// Outcome of handling one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing observable changed beyond the latest coarse fix.
    Unchanged,
    /// Resolution ran but no building was found.
    NoBuilding,
    /// Resolution picked the building that is already being handled.
    SameBuilding { building_id: String },
    /// A building was selected and its subscription started.
    BuildingEntered {
        building_id: String,
        subscription: SubscriptionHandle,
    },
    /// An indoor fix was applied.
    PositionUpdated { floor_changed: bool },
    /// The device left the building; building state was cleared.
    BuildingExited { building_id: String },
}

/// Owns the positioning subscription lifecycle.
pub struct PositioningSessionManager<P: PositioningService> {
    /// Positioning SDK.
    service: Arc<P>,

    /// Sender handed to every subscription the manager starts.
    events_tx: mpsc::Sender<SubscriptionEvent>,

    phase: SessionPhase,
    location: Option<Fix>,
    position: Option<Fix>,
    building: Option<Building>,
    floors: Option<Vec<Floor>>,
    floor_id: Option<String>,
    subscription: Option<SubscriptionHandle>,

    /// Building id whose transition has already been acted on.
    handled_building: Option<String>,

    /// Phase to fall back to if the pending resolution finds nothing.
    resolving_from: SessionPhase,
}

impl<P: PositioningService> PositioningSessionManager<P> {
    /// Create an idle manager.
    ///
    /// `events_tx` is cloned into every subscription; the matching receiver
    /// feeds [`handle_positioning`](Self::handle_positioning).
    pub fn new(service: Arc<P>, events_tx: mpsc::Sender<SubscriptionEvent>) -> Self {
        Self {
            service,
            events_tx,
            phase: SessionPhase::Idle,
            location: None,
            position: None,
            building: None,
            floors: None,
            floor_id: None,
            subscription: None,
            handled_building: None,
            resolving_from: SessionPhase::Idle,
        }
    }

    /// Handle a coarse fix from the device location source.
    ///
    /// The fix is always recorded. While an indoor position is live nothing
    /// else happens; otherwise buildings are fetched and the nearest one is
    /// entered.
    pub async fn handle_location(&mut self, fix: Fix) -> Result<Transition, SessionError> {
        if !self.begin_resolution(fix) {
            return Ok(Transition::Unchanged);
        }
        self.resolve().await
    }

    /// Record a coarse fix and, when no indoor position is live, enter
    /// [`SessionPhase::Resolving`].
    ///
    /// Returns whether [`resolve`](Self::resolve) should follow. Split from
    /// [`handle_location`](Self::handle_location) so the `Resolving` phase can
    /// be published before the building fetch is awaited.
    pub fn begin_resolution(&mut self, fix: Fix) -> bool {
        self.location = Some(fix);

        if self.position.is_some() {
            tracing::trace!("Indoor position live, coarse location only recorded");
            return false;
        }

        if self.phase != SessionPhase::Resolving {
            self.resolving_from = self.phase;
        }
        self.phase = SessionPhase::Resolving;
        true
    }

    /// Handle an event from a positioning subscription.
    pub async fn handle_positioning(
        &mut self,
        event: SubscriptionEvent,
    ) -> Result<Transition, SessionError> {
        if self.subscription != Some(event.subscription) {
            tracing::trace!(
                subscription = %event.subscription,
                "Dropping event from stale subscription"
            );
            return Ok(Transition::Unchanged);
        }

        match event.event {
            PositioningEvent::Update(PositioningUpdate::Indoor { fix, floor_id }) => {
                let floor_changed = self.floor_id.as_deref() != Some(floor_id.as_str());
                if floor_changed {
                    tracing::info!(floor_id = %floor_id, "Floor changed");
                }
                tracing::trace!(
                    floor_id = %floor_id,
                    age_ms = fix.age().as_millis() as u64,
                    "Indoor fix"
                );
                self.position = Some(fix);
                self.floor_id = Some(floor_id);
                Ok(Transition::PositionUpdated { floor_changed })
            }
            PositioningEvent::Update(PositioningUpdate::Outdoor) => Ok(self.exit_building().await),
            PositioningEvent::Status(status) => {
                tracing::info!(
                    subscription = %event.subscription,
                    status = %status,
                    "Positioning status"
                );
                Ok(Transition::Unchanged)
            }
            PositioningEvent::Error(e) => Err(e.into()),
        }
    }

    /// Return to idle and stop the live subscription, if any.
    ///
    /// State is cleared before the stop is awaited, so an abandoned stop
    /// still leaves the session idle.
    pub async fn shutdown(&mut self) {
        let live = self.subscription.take();
        self.clear_building();
        self.phase = SessionPhase::Idle;

        if let Some(handle) = live {
            self.stop_subscription(handle).await;
        }
    }

    /// Fetch buildings and enter the one nearest to the latest coarse fix.
    ///
    /// Does nothing unless [`begin_resolution`](Self::begin_resolution)
    /// put the session in `Resolving`.
    pub async fn resolve(&mut self) -> Result<Transition, SessionError> {
        if self.phase != SessionPhase::Resolving {
            return Ok(Transition::Unchanged);
        }
        let previous = self.resolving_from;
        let Some(point) = self.location.as_ref().map(Fix::position) else {
            self.phase = previous;
            return Ok(Transition::Unchanged);
        };

        let buildings = match self.service.fetch_buildings().await {
            Ok(buildings) => buildings,
            Err(e) => {
                self.phase = previous;
                return Err(e.into());
            }
        };

        let Some((nearest, distance)) = nearest_with_distance(point, &buildings) else {
            tracing::debug!("No buildings returned, staying outdoor");
            self.phase = previous;
            return Ok(Transition::NoBuilding);
        };

        tracing::debug!(
            building_id = %nearest.id,
            distance_m = distance,
            fix_age_ms = self.location.as_ref().map_or(0, |f| f.age().as_millis() as u64),
            candidates = buildings.len(),
            "Nearest building resolved"
        );

        let nearest = nearest.clone();
        self.enter_building(nearest).await
    }

    /// Switch the session to `building`.
    ///
    /// Stops any stale subscription first, then fetches floors and starts the
    /// new subscription concurrently.
    async fn enter_building(&mut self, building: Building) -> Result<Transition, SessionError> {
        if self.handled_building.as_deref() == Some(building.id.as_str()) {
            tracing::trace!(building_id = %building.id, "Building already handled");
            self.phase = SessionPhase::Active;
            return Ok(Transition::SameBuilding {
                building_id: building.id,
            });
        }
        self.handled_building = Some(building.id.clone());

        if let Some(stale) = self.subscription.take() {
            self.stop_subscription(stale).await;
            self.position = None;
            self.floor_id = None;
        }
        self.floors = None;

        tracing::info!(
            building_id = %building.id,
            name = %building.name,
            "Entering building, starting positioning"
        );

        let service = Arc::clone(&self.service);
        let request = PositioningRequest::for_building(&building);
        let (floors, started) = tokio::join!(
            service.fetch_floors(&building),
            service.start_positioning(request, self.events_tx.clone()),
        );

        match floors {
            Ok(floors) => {
                tracing::debug!(
                    building_id = %building.id,
                    count = floors.len(),
                    "Floors fetched"
                );
                self.floors = Some(floors);
            }
            Err(e) => {
                let e = SessionError::from(e);
                tracing::warn!(kind = e.kind(), error = %e, "Floor list unavailable, overlay disabled");
            }
        }

        match started {
            Ok(handle) => {
                tracing::info!(
                    building_id = %building.id,
                    subscription = %handle,
                    "Positioning started"
                );
                let building_id = building.id.clone();
                self.building = Some(building);
                self.subscription = Some(handle);
                self.phase = SessionPhase::Active;
                Ok(Transition::BuildingEntered {
                    building_id,
                    subscription: handle,
                })
            }
            Err(e) => {
                self.clear_building();
                self.phase = SessionPhase::Idle;
                Err(e.into())
            }
        }
    }

    /// Leave the current building after an outdoor classification.
    async fn exit_building(&mut self) -> Transition {
        let building_id = self
            .building
            .as_ref()
            .map(|b| b.id.clone())
            .unwrap_or_default();

        if let Some(handle) = self.subscription.take() {
            self.stop_subscription(handle).await;
        }
        self.clear_building();
        self.phase = SessionPhase::Idle;

        tracing::info!(building_id = %building_id, "Left building, positioning stopped");
        Transition::BuildingExited { building_id }
    }

    /// Stop a subscription; failures are logged, never propagated.
    async fn stop_subscription(&self, handle: SubscriptionHandle) {
        match self.service.stop_positioning(handle).await {
            Ok(()) => tracing::debug!(subscription = %handle, "Positioning stopped"),
            Err(e) => tracing::warn!(
                subscription = %handle,
                error = %e,
                "Failed to stop positioning, continuing"
            ),
        }
    }

    fn clear_building(&mut self) {
        self.building = None;
        self.floors = None;
        self.position = None;
        self.floor_id = None;
        self.handled_building = None;
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Latest coarse fix.
    pub fn location(&self) -> Option<&Fix> {
        self.location.as_ref()
    }

    /// Latest indoor fix.
    pub fn position(&self) -> Option<&Fix> {
        self.position.as_ref()
    }

    /// Current building.
    pub fn building(&self) -> Option<&Building> {
        self.building.as_ref()
    }

    /// Floors of the current building.
    pub fn floors(&self) -> Option<&[Floor]> {
        self.floors.as_deref()
    }

    /// Active floor identifier.
    pub fn floor_id(&self) -> Option<&str> {
        self.floor_id.as_deref()
    }

    /// Live subscription handle.
    pub fn subscription(&self) -> Option<SubscriptionHandle> {
        self.subscription
    }

    /// Check if an indoor position is live.
    pub fn is_indoor(&self) -> bool {
        self.position.is_some()
    }

    /// Copy of the observable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            location: self.location.clone(),
            position: self.position.clone(),
            building: self.building.clone(),
            floors: self.floors.clone(),
            floor_id: self.floor_id.clone(),
            subscription: self.subscription,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;
    use crate::positioning::building::{BuildingBounds, Dimensions};
    use crate::positioning::error::PositioningError;
    use crate::simulation::{ServiceCall, ServiceFaults, SimulatedPositioningService};

    fn building(id: &str, lat: f64, lon: f64) -> Building {
        Building {
            id: id.to_string(),
            name: format!("Building {}", id),
            center: LatLon::new(lat, lon),
            bounds: BuildingBounds {
                north_east: LatLon::new(lat + 0.001, lon + 0.001),
                south_west: LatLon::new(lat - 0.001, lon - 0.001),
            },
            rotation: 0.0,
            dimensions: Dimensions {
                width: 100.0,
                height: 60.0,
            },
        }
    }

    fn floor(id: &str, building_id: &str, url: &str) -> Floor {
        Floor {
            id: id.to_string(),
            building_id: building_id.to_string(),
            level: 0,
            map_url: url.to_string(),
        }
    }

    fn create_manager() -> (
        PositioningSessionManager<SimulatedPositioningService>,
        Arc<SimulatedPositioningService>,
        mpsc::Receiver<SubscriptionEvent>,
    ) {
        let service = Arc::new(SimulatedPositioningService::new(
            vec![building("A", 35.0, 139.0), building("B", 35.1, 139.1)],
            vec![
                floor("F1", "A", "u1"),
                floor("F2", "A", "u2"),
                floor("G1", "B", "g1"),
            ],
        ));
        let (tx, rx) = mpsc::channel(16);
        let manager = PositioningSessionManager::new(Arc::clone(&service), tx);
        (manager, service, rx)
    }

    fn coarse(lat: f64, lon: f64) -> Fix {
        Fix::from_geolocation(lat, lon, 0.0, None)
    }

    fn indoor(handle: SubscriptionHandle, floor_id: &str) -> SubscriptionEvent {
        SubscriptionEvent {
            subscription: handle,
            event: PositioningEvent::Update(PositioningUpdate::Indoor {
                fix: Fix::from_indoor(35.0001, 139.0001, 45.0, Some(2.0)),
                floor_id: floor_id.to_string(),
            }),
        }
    }

    fn outdoor(handle: SubscriptionHandle) -> SubscriptionEvent {
        SubscriptionEvent {
            subscription: handle,
            event: PositioningEvent::Update(PositioningUpdate::Outdoor),
        }
    }

    #[tokio::test]
    async fn test_begin_resolution_exposes_resolving_phase() {
        let (mut manager, service, _rx) = create_manager();

        assert!(manager.begin_resolution(coarse(35.0, 139.0)));
        assert_eq!(manager.phase(), SessionPhase::Resolving);
        assert_eq!(manager.snapshot().phase, SessionPhase::Resolving);
        assert!(service.calls().is_empty());

        let transition = manager.resolve().await.unwrap();
        assert!(matches!(transition, Transition::BuildingEntered { .. }));
        assert_eq!(manager.phase(), SessionPhase::Active);
    }

    #[tokio::test]
    async fn test_resolve_without_begin_is_noop() {
        let (mut manager, service, _rx) = create_manager();

        assert_eq!(manager.resolve().await.unwrap(), Transition::Unchanged);
        assert_eq!(manager.phase(), SessionPhase::Idle);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_begin_resolution_skipped_while_indoor() {
        let (mut manager, _service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let handle = manager.subscription().unwrap();
        manager.handle_positioning(indoor(handle, "F1")).await.unwrap();

        assert!(!manager.begin_resolution(coarse(35.1, 139.1)));
        assert_eq!(manager.phase(), SessionPhase::Active);
        assert_eq!(manager.location().unwrap().latitude, 35.1);
    }

    #[tokio::test]
    async fn test_failed_resolution_restores_phase_from_before_begin() {
        let (mut manager, service, _rx) = create_manager();
        service.set_faults(ServiceFaults {
            fail_buildings: true,
            ..Default::default()
        });

        assert!(manager.begin_resolution(coarse(35.0, 139.0)));
        assert!(manager.resolve().await.is_err());
        assert_eq!(manager.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (manager, _service, _rx) = create_manager();
        assert_eq!(manager.phase(), SessionPhase::Idle);
        assert!(manager.building().is_none());
        assert!(manager.subscription().is_none());
    }

    #[tokio::test]
    async fn test_coarse_location_enters_nearest_building() {
        let (mut manager, service, _rx) = create_manager();

        let transition = manager.handle_location(coarse(35.01, 139.0)).await.unwrap();

        let handle = manager.subscription().expect("subscription started");
        assert_eq!(
            transition,
            Transition::BuildingEntered {
                building_id: "A".to_string(),
                subscription: handle,
            }
        );
        assert_eq!(manager.phase(), SessionPhase::Active);
        assert_eq!(manager.building().unwrap().id, "A");
        assert_eq!(manager.floors().unwrap().len(), 2);
        assert_eq!(service.live_subscriptions(), vec![handle]);
    }

    #[tokio::test]
    async fn test_no_buildings_stays_idle() {
        let service = Arc::new(SimulatedPositioningService::new(vec![], vec![]));
        let (tx, _rx) = mpsc::channel(16);
        let mut manager = PositioningSessionManager::new(Arc::clone(&service), tx);

        let transition = manager.handle_location(coarse(35.0, 139.0)).await.unwrap();

        assert_eq!(transition, Transition::NoBuilding);
        assert_eq!(manager.phase(), SessionPhase::Idle);
        assert!(manager.location().is_some());
        assert!(service.live_subscriptions().is_empty());
    }

    #[tokio::test]
    async fn test_building_fetch_error_aborts_resolution() {
        let (mut manager, service, _rx) = create_manager();
        service.set_faults(ServiceFaults {
            fail_buildings: true,
            ..Default::default()
        });

        let result = manager.handle_location(coarse(35.0, 139.0)).await;

        assert!(matches!(result, Err(SessionError::BuildingFetch(_))));
        assert_eq!(manager.phase(), SessionPhase::Idle);
        assert!(manager.building().is_none());
        assert!(!service
            .calls()
            .iter()
            .any(|c| matches!(c, ServiceCall::StartPositioning { .. })));
    }

    #[tokio::test]
    async fn test_floor_fetch_error_keeps_positioning() {
        let (mut manager, service, _rx) = create_manager();
        service.set_faults(ServiceFaults {
            fail_floors: true,
            ..Default::default()
        });

        let transition = manager.handle_location(coarse(35.0, 139.0)).await.unwrap();

        assert!(matches!(transition, Transition::BuildingEntered { .. }));
        assert!(manager.floors().is_none());
        assert_eq!(manager.phase(), SessionPhase::Active);
    }

    #[tokio::test]
    async fn test_start_failure_clears_building() {
        let (mut manager, service, _rx) = create_manager();
        service.set_faults(ServiceFaults {
            fail_start: true,
            ..Default::default()
        });

        let result = manager.handle_location(coarse(35.0, 139.0)).await;

        assert!(matches!(result, Err(SessionError::Positioning(_))));
        assert_eq!(manager.phase(), SessionPhase::Idle);
        assert!(manager.building().is_none());
        assert!(manager.floors().is_none());

        // Guard was cleared, so the same building is retried
        service.set_faults(ServiceFaults::default());
        let transition = manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        assert!(matches!(transition, Transition::BuildingEntered { .. }));
    }

    #[tokio::test]
    async fn test_same_building_is_ignored() {
        let (mut manager, service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        service.clear_calls();

        let transition = manager.handle_location(coarse(35.0002, 139.0)).await.unwrap();

        assert_eq!(
            transition,
            Transition::SameBuilding {
                building_id: "A".to_string()
            }
        );
        assert_eq!(manager.phase(), SessionPhase::Active);
        // Only the building list was consulted
        assert_eq!(service.calls(), vec![ServiceCall::FetchBuildings]);
    }

    #[tokio::test]
    async fn test_indoor_fix_updates_position_and_floor() {
        let (mut manager, _service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let handle = manager.subscription().unwrap();

        let transition = manager.handle_positioning(indoor(handle, "F2")).await.unwrap();
        assert_eq!(transition, Transition::PositionUpdated { floor_changed: true });
        assert_eq!(manager.floor_id(), Some("F2"));
        assert!(manager.is_indoor());

        let transition = manager.handle_positioning(indoor(handle, "F2")).await.unwrap();
        assert_eq!(transition, Transition::PositionUpdated { floor_changed: false });
    }

    #[tokio::test]
    async fn test_coarse_location_ignored_while_indoor() {
        let (mut manager, service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let handle = manager.subscription().unwrap();
        manager.handle_positioning(indoor(handle, "F1")).await.unwrap();
        service.clear_calls();

        // Even a location near building B does not re-resolve
        let transition = manager.handle_location(coarse(35.1, 139.1)).await.unwrap();

        assert_eq!(transition, Transition::Unchanged);
        assert!(service.calls().is_empty());
        assert_eq!(manager.location().unwrap().latitude, 35.1);
        assert_eq!(manager.building().unwrap().id, "A");
    }

    #[tokio::test]
    async fn test_outdoor_clears_building_and_stops_subscription() {
        let (mut manager, service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let handle = manager.subscription().unwrap();
        manager.handle_positioning(indoor(handle, "F1")).await.unwrap();

        let transition = manager.handle_positioning(outdoor(handle)).await.unwrap();

        assert_eq!(
            transition,
            Transition::BuildingExited {
                building_id: "A".to_string()
            }
        );
        assert_eq!(manager.phase(), SessionPhase::Idle);
        assert!(manager.building().is_none());
        assert!(manager.floors().is_none());
        assert!(manager.position().is_none());
        assert!(manager.floor_id().is_none());
        assert!(manager.subscription().is_none());
        assert!(service.live_subscriptions().is_empty());
        assert!(service
            .calls()
            .contains(&ServiceCall::StopPositioning { handle }));
    }

    #[tokio::test]
    async fn test_reentering_same_building_after_outdoor() {
        let (mut manager, service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let first = manager.subscription().unwrap();
        manager.handle_positioning(outdoor(first)).await.unwrap();

        let transition = manager.handle_location(coarse(35.0, 139.0)).await.unwrap();

        let second = manager.subscription().unwrap();
        assert_ne!(first, second);
        assert_eq!(
            transition,
            Transition::BuildingEntered {
                building_id: "A".to_string(),
                subscription: second,
            }
        );
        assert_eq!(service.live_subscriptions(), vec![second]);
    }

    #[tokio::test]
    async fn test_switching_building_stops_before_start() {
        let (mut manager, service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let first = manager.subscription().unwrap();
        service.clear_calls();

        // No indoor fix yet, so a coarse fix near B re-resolves
        let transition = manager.handle_location(coarse(35.1, 139.1)).await.unwrap();

        let second = manager.subscription().unwrap();
        assert_eq!(
            transition,
            Transition::BuildingEntered {
                building_id: "B".to_string(),
                subscription: second,
            }
        );
        let calls = service.calls();
        let stop = calls
            .iter()
            .position(|c| *c == ServiceCall::StopPositioning { handle: first })
            .expect("old subscription stopped");
        let start = calls
            .iter()
            .position(|c| matches!(c, ServiceCall::StartPositioning { building_id, .. } if building_id == "B"))
            .expect("new subscription started");
        assert!(stop < start);
        assert_eq!(service.live_subscriptions(), vec![second]);
        assert_eq!(manager.floors().unwrap()[0].id, "G1");
    }

    #[tokio::test]
    async fn test_stop_failure_still_starts_replacement() {
        let (mut manager, service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        service.set_faults(ServiceFaults {
            fail_stop: true,
            ..Default::default()
        });

        let transition = manager.handle_location(coarse(35.1, 139.1)).await.unwrap();

        assert!(matches!(transition, Transition::BuildingEntered { .. }));
        assert_eq!(manager.building().unwrap().id, "B");
    }

    #[tokio::test]
    async fn test_stale_subscription_events_dropped() {
        let (mut manager, _service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let first = manager.subscription().unwrap();
        manager.handle_location(coarse(35.1, 139.1)).await.unwrap();

        let transition = manager.handle_positioning(outdoor(first)).await.unwrap();
        assert_eq!(transition, Transition::Unchanged);
        assert_eq!(manager.phase(), SessionPhase::Active);

        let transition = manager.handle_positioning(indoor(first, "F1")).await.unwrap();
        assert_eq!(transition, Transition::Unchanged);
        assert!(manager.position().is_none());
    }

    #[tokio::test]
    async fn test_status_and_error_do_not_change_state() {
        let (mut manager, _service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let handle = manager.subscription().unwrap();

        let status = SubscriptionEvent {
            subscription: handle,
            event: PositioningEvent::Status("CALCULATING".to_string()),
        };
        assert_eq!(
            manager.handle_positioning(status).await.unwrap(),
            Transition::Unchanged
        );

        let error = SubscriptionEvent {
            subscription: handle,
            event: PositioningEvent::Error(PositioningError::Service("beacon lost".to_string())),
        };
        let result = manager.handle_positioning(error).await;
        assert!(matches!(result, Err(SessionError::Positioning(_))));
        assert_eq!(manager.phase(), SessionPhase::Active);
        assert_eq!(manager.subscription(), Some(handle));
    }

    #[tokio::test]
    async fn test_shutdown_stops_subscription() {
        let (mut manager, service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();

        manager.shutdown().await;

        assert_eq!(manager.phase(), SessionPhase::Idle);
        assert!(manager.subscription().is_none());
        assert!(service.live_subscriptions().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_mirrors_state() {
        let (mut manager, _service, _rx) = create_manager();
        manager.handle_location(coarse(35.0, 139.0)).await.unwrap();
        let handle = manager.subscription().unwrap();
        manager.handle_positioning(indoor(handle, "F1")).await.unwrap();

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Active);
        assert_eq!(snapshot.building_id(), Some("A"));
        assert_eq!(snapshot.floor_id.as_deref(), Some("F1"));
        assert_eq!(snapshot.subscription, Some(handle));
        assert!(snapshot.is_indoor());
    }
}
