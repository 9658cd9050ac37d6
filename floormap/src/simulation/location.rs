//! In-memory device location source.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::positioning::{
    Fix, LocationError, LocationEvent, LocationSource, LocationWatchOptions, WatchId,
};

struct Watch {
    options: LocationWatchOptions,
    events: mpsc::Sender<LocationEvent>,
}

struct LocationState {
    watches: BTreeMap<WatchId, Watch>,
    next_id: u64,
    permission_denied: bool,
}

/// Location source driven by explicit [`emit`](Self::emit) calls.
pub struct SimulatedLocationSource {
    state: Mutex<LocationState>,
}

impl Default for SimulatedLocationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedLocationSource {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LocationState {
                watches: BTreeMap::new(),
                next_id: 1,
                permission_denied: false,
            }),
        }
    }

    /// Make subsequent `watch_position` calls fail with `PermissionDenied`.
    pub fn set_permission_denied(&self, denied: bool) {
        self.state.lock().permission_denied = denied;
    }

    /// Number of registered watches.
    pub fn active_watches(&self) -> usize {
        self.state.lock().watches.len()
    }

    /// Options of the most recently registered watch.
    pub fn last_options(&self) -> Option<LocationWatchOptions> {
        self.state
            .lock()
            .watches
            .values()
            .next_back()
            .map(|w| w.options.clone())
    }

    /// Push an event to every watch. Returns the number of deliveries.
    pub async fn emit(&self, event: LocationEvent) -> usize {
        let targets: Vec<_> = {
            let state = self.state.lock();
            state.watches.values().map(|w| w.events.clone()).collect()
        };

        let mut delivered = 0;
        for events in targets {
            if events.send(event.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Push a coarse fix to every watch.
    pub async fn emit_fix(
        &self,
        latitude: f64,
        longitude: f64,
        heading: f64,
        accuracy: Option<f64>,
    ) -> usize {
        self.emit(Ok(Fix::from_geolocation(latitude, longitude, heading, accuracy)))
            .await
    }
}

impl LocationSource for SimulatedLocationSource {
    fn watch_position(
        &self,
        options: LocationWatchOptions,
        events: mpsc::Sender<LocationEvent>,
    ) -> Result<WatchId, LocationError> {
        let mut state = self.state.lock();
        if state.permission_denied {
            return Err(LocationError::PermissionDenied);
        }

        let id = WatchId::new(state.next_id);
        state.next_id += 1;
        state.watches.insert(id, Watch { options, events });

        tracing::debug!(watch_id = id.id(), "Location watch registered");
        Ok(id)
    }

    fn clear_watch(&self, id: WatchId) {
        if self.state.lock().watches.remove(&id).is_some() {
            tracing::debug!(watch_id = id.id(), "Location watch cleared");
        }
    }
}
