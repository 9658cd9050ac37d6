//! In-memory positioning service.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::positioning::{
    Building, BuildingFetchError, Floor, FloorFetchError, PositioningError, PositioningEvent,
    PositioningRequest, PositioningService, SubscriptionEvent, SubscriptionHandle,
};

use super::scenario::Scenario;

/// A call made against the simulated service, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    RequestAuthorization,
    FetchBuildings,
    FetchFloors {
        building_id: String,
    },
    StartPositioning {
        building_id: String,
        /// Handle allocated, `None` if the start failed.
        handle: Option<SubscriptionHandle>,
    },
    StopPositioning {
        handle: SubscriptionHandle,
    },
}

/// Failures to inject into the next calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFaults {
    pub fail_buildings: bool,
    pub fail_floors: bool,
    pub fail_start: bool,
    /// Report stop failures. The subscription stays live.
    pub fail_stop: bool,
    /// Building fetches never complete.
    pub hang_buildings: bool,
    /// Stops never complete. The subscription stays live.
    pub hang_stop: bool,
}

struct LiveSubscription {
    building_id: String,
    events: mpsc::Sender<SubscriptionEvent>,
}

struct ServiceState {
    buildings: Vec<Building>,
    floors: Vec<Floor>,
    subscriptions: BTreeMap<SubscriptionHandle, LiveSubscription>,
    next_handle: u64,
    calls: Vec<ServiceCall>,
    faults: ServiceFaults,
    authorized: bool,
}

/// Positioning service backed by a fixed building and floor catalogue.
///
/// Every call is recorded. Updates are pushed to live subscriptions with
/// [`emit`](Self::emit), tagged with each subscription's handle.
pub struct SimulatedPositioningService {
    state: Mutex<ServiceState>,
}

impl SimulatedPositioningService {
    /// Create a service serving `buildings` and `floors`.
    pub fn new(buildings: Vec<Building>, floors: Vec<Floor>) -> Self {
        Self {
            state: Mutex::new(ServiceState {
                buildings,
                floors,
                subscriptions: BTreeMap::new(),
                next_handle: 1,
                calls: Vec::new(),
                faults: ServiceFaults::default(),
                authorized: false,
            }),
        }
    }

    /// Create a service serving a scenario's catalogue.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self::new(scenario.buildings.clone(), scenario.floors.clone())
    }

    /// Replace the injected faults.
    pub fn set_faults(&self, faults: ServiceFaults) {
        self.state.lock().faults = faults;
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state.lock().calls.clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Handles of live subscriptions, oldest first.
    pub fn live_subscriptions(&self) -> Vec<SubscriptionHandle> {
        self.state.lock().subscriptions.keys().copied().collect()
    }

    /// Building a live subscription was started for.
    pub fn subscription_building(&self, handle: SubscriptionHandle) -> Option<String> {
        self.state
            .lock()
            .subscriptions
            .get(&handle)
            .map(|s| s.building_id.clone())
    }

    /// Check if authorization was requested.
    pub fn is_authorized(&self) -> bool {
        self.state.lock().authorized
    }

    /// Push `event` to every live subscription.
    ///
    /// Returns the number of subscriptions the event was delivered to.
    pub async fn emit(&self, event: PositioningEvent) -> usize {
        let targets: Vec<_> = {
            let state = self.state.lock();
            state
                .subscriptions
                .iter()
                .map(|(handle, sub)| (*handle, sub.events.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (handle, events) in targets {
            let tagged = SubscriptionEvent {
                subscription: handle,
                event: event.clone(),
            };
            if events.send(tagged).await.is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(subscription = %handle, "Subscription receiver gone");
            }
        }
        delivered
    }

    fn record(state: &mut ServiceState, call: ServiceCall) {
        state.calls.push(call);
    }
}

impl PositioningService for SimulatedPositioningService {
    fn request_authorization(&self) {
        let mut state = self.state.lock();
        Self::record(&mut state, ServiceCall::RequestAuthorization);
        state.authorized = true;
    }

    async fn fetch_buildings(&self) -> Result<Vec<Building>, BuildingFetchError> {
        {
            let mut state = self.state.lock();
            Self::record(&mut state, ServiceCall::FetchBuildings);

            if state.faults.fail_buildings {
                return Err(BuildingFetchError::Service("simulated failure".to_string()));
            }
            if !state.faults.hang_buildings {
                return Ok(state.buildings.clone());
            }
        }
        std::future::pending().await
    }

    async fn fetch_floors(&self, building: &Building) -> Result<Vec<Floor>, FloorFetchError> {
        let mut state = self.state.lock();
        Self::record(
            &mut state,
            ServiceCall::FetchFloors {
                building_id: building.id.clone(),
            },
        );

        if state.faults.fail_floors {
            return Err(FloorFetchError::Service {
                building_id: building.id.clone(),
                reason: "simulated failure".to_string(),
            });
        }
        Ok(state
            .floors
            .iter()
            .filter(|floor| floor.building_id == building.id)
            .cloned()
            .collect())
    }

    async fn start_positioning(
        &self,
        request: PositioningRequest,
        events: mpsc::Sender<SubscriptionEvent>,
    ) -> Result<SubscriptionHandle, PositioningError> {
        let mut state = self.state.lock();

        let result = if state.faults.fail_start {
            Err(PositioningError::Service("simulated failure".to_string()))
        } else if !state.buildings.iter().any(|b| b.id == request.building_id) {
            Err(PositioningError::UnknownBuilding(request.building_id.clone()))
        } else {
            let handle = SubscriptionHandle::new(state.next_handle);
            state.next_handle += 1;
            state.subscriptions.insert(
                handle,
                LiveSubscription {
                    building_id: request.building_id.clone(),
                    events,
                },
            );
            Ok(handle)
        };

        Self::record(
            &mut state,
            ServiceCall::StartPositioning {
                building_id: request.building_id,
                handle: result.as_ref().ok().copied(),
            },
        );
        result
    }

    async fn stop_positioning(&self, handle: SubscriptionHandle) -> Result<(), PositioningError> {
        {
            let mut state = self.state.lock();
            Self::record(&mut state, ServiceCall::StopPositioning { handle });

            if state.faults.fail_stop {
                return Err(PositioningError::Service("simulated failure".to_string()));
            }
            if !state.faults.hang_stop {
                return match state.subscriptions.remove(&handle) {
                    Some(_) => Ok(()),
                    None => Err(PositioningError::UnknownSubscription(handle)),
                };
            }
        }
        std::future::pending().await
    }
}
