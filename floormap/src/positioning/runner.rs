//! Session runner - the event loop that owns the session manager.
//!
//! The [`SessionRunner`] is a single tokio task. It receives coarse fixes
//! from a [`LocationSource`] and tagged events from the
//! [`PositioningService`] on mpsc channels and hands them to the
//! [`PositioningSessionManager`] one at a time. After every event it projects
//! the overlay state, drives the [`MapSurface`] and publishes a
//! [`SessionSnapshot`] on a watch channel.
//!
//! # Usage
//!
//! ```ignore
//! let cancel = CancellationToken::new();
//! let runner = SessionRunner::new(service, location, surface, config, cancel.clone());
//! let mut snapshots = runner.subscribe();
//! let handle = runner.start();
//!
//! snapshots.changed().await?;
//! cancel.cancel();
//! let surface = handle.await??;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::SessionError;
use super::service::{
    LocationEvent, LocationSource, LocationWatchOptions, PositioningService, SubscriptionEvent,
};
use super::session::{PositioningSessionManager, Transition};
use super::state::SessionSnapshot;
use crate::config::ConfigFile;
use crate::geo::LatLon;
use crate::overlay::{CameraRequest, MapRegion, MapSurface, OverlayProjector};

/// Default channel capacity for location and positioning events.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Map region shown before the first fix arrives (central Tokyo).
pub const DEFAULT_INITIAL_REGION: MapRegion = MapRegion {
    center: LatLon::new(35.68547446159457, 139.75297856553277),
    latitude_delta: 0.0922,
    longitude_delta: 0.0421,
};

/// Upper bound on stopping the live subscription once cancelled.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// One queued input for the manager.
enum SessionInput {
    Location(LocationEvent),
    Positioning(SubscriptionEvent),
}

/// Configuration for the session runner.
#[derive(Debug, Clone)]
pub struct SessionRunnerConfig {
    /// Capacity of the location and positioning event channels.
    pub event_channel_capacity: usize,

    /// Options for the device location watch.
    pub location_options: LocationWatchOptions,

    /// Region shown at startup.
    pub initial_region: MapRegion,

    /// Latitude/longitude span of building regions.
    pub region_delta: f64,

    /// How long teardown waits for the subscription stop.
    pub shutdown_timeout: Duration,
}

impl Default for SessionRunnerConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            location_options: LocationWatchOptions::default(),
            initial_region: DEFAULT_INITIAL_REGION,
            region_delta: crate::overlay::DEFAULT_REGION_DELTA,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl SessionRunnerConfig {
    /// Build runner settings from the configuration file.
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            event_channel_capacity: config.session.event_channel_capacity,
            location_options: config.location.watch_options(),
            initial_region: config.map.initial_region(),
            region_delta: config.map.building_region_delta,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

/// Event loop driving one positioning session.
pub struct SessionRunner<P, L, M>
where
    P: PositioningService + 'static,
    L: LocationSource + 'static,
    M: MapSurface + 'static,
{
    manager: PositioningSessionManager<P>,
    service: Arc<P>,
    location_source: Arc<L>,
    surface: M,
    projector: OverlayProjector,
    config: SessionRunnerConfig,

    /// Tagged events from every subscription the manager starts.
    events_rx: mpsc::Receiver<SubscriptionEvent>,

    /// Latest session state.
    snapshot_tx: watch::Sender<SessionSnapshot>,

    cancellation: CancellationToken,
}

impl<P, L, M> SessionRunner<P, L, M>
where
    P: PositioningService + 'static,
    L: LocationSource + 'static,
    M: MapSurface + 'static,
{
    /// Create a new runner. Nothing happens until [`start`](Self::start) or
    /// [`run`](Self::run).
    pub fn new(
        service: Arc<P>,
        location_source: Arc<L>,
        surface: M,
        config: SessionRunnerConfig,
        cancellation: CancellationToken,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(config.event_channel_capacity);
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());

        Self {
            manager: PositioningSessionManager::new(Arc::clone(&service), events_tx),
            service,
            location_source,
            surface,
            projector: OverlayProjector::new(config.region_delta),
            config,
            events_rx,
            snapshot_tx,
            cancellation,
        }
    }

    /// Subscribe to session snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Start the runner as an async task.
    ///
    /// The task yields the map surface back when the session ends.
    pub fn start(self) -> JoinHandle<Result<M, SessionError>> {
        tokio::spawn(self.run())
    }

    /// Run the session until cancelled.
    ///
    /// Fails only if the location watch cannot be registered.
    pub async fn run(mut self) -> Result<M, SessionError> {
        self.service.request_authorization();

        let (location_tx, mut location_rx) = mpsc::channel(self.config.event_channel_capacity);
        let watch_id = self
            .location_source
            .watch_position(self.config.location_options.clone(), location_tx)?;

        self.surface.show_region(&self.config.initial_region);

        tracing::info!(
            watch_id = watch_id.id(),
            high_accuracy = self.config.location_options.high_accuracy,
            interval_ms = self.config.location_options.interval.as_millis() as u64,
            "Positioning session started"
        );

        let cancellation = self.cancellation.clone();
        let mut location_open = true;

        loop {
            let input = tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    tracing::debug!("Session cancelled");
                    break;
                }

                event = location_rx.recv(), if location_open => match event {
                    Some(event) => SessionInput::Location(event),
                    None => {
                        tracing::debug!("Location source closed");
                        location_open = false;
                        continue;
                    }
                },

                Some(event) = self.events_rx.recv() => SessionInput::Positioning(event),
            };

            // Handlers suspend on external calls; cancellation must still win
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    tracing::debug!(phase = %self.manager.phase(), "Session cancelled mid-transition");
                    break;
                }

                _ = self.dispatch(input) => {}
            }
        }

        self.location_source.clear_watch(watch_id);
        if tokio::time::timeout(self.config.shutdown_timeout, self.manager.shutdown())
            .await
            .is_err()
        {
            tracing::warn!(
                timeout_ms = self.config.shutdown_timeout.as_millis() as u64,
                "Positioning stop timed out, abandoning subscription"
            );
        }
        self.snapshot_tx.send_replace(self.manager.snapshot());

        tracing::info!("Positioning session stopped");
        Ok(self.surface)
    }

    async fn dispatch(&mut self, input: SessionInput) {
        match input {
            SessionInput::Location(event) => self.on_location(event).await,
            SessionInput::Positioning(event) => self.on_positioning(event).await,
        }
    }

    async fn on_location(&mut self, event: LocationEvent) {
        let fix = match event {
            Ok(fix) => fix,
            Err(e) => {
                log_error(&SessionError::from(e));
                return;
            }
        };

        // Coarse fixes only move the camera while outdoor
        if !self.manager.is_indoor() {
            self.surface
                .animate_camera(&CameraRequest::recenter(fix.position()));
        }

        if !self.manager.begin_resolution(fix) {
            self.complete(Ok(Transition::Unchanged));
            return;
        }

        // Publish `Resolving` before the building fetch is awaited
        self.complete(Ok(Transition::Unchanged));
        let result = self.manager.resolve().await;
        self.complete(result);
    }

    async fn on_positioning(&mut self, event: SubscriptionEvent) {
        let result = self.manager.handle_positioning(event).await;

        if let Ok(Transition::PositionUpdated { .. }) = result {
            if let Some(position) = self.manager.position() {
                self.surface
                    .animate_camera(&CameraRequest::follow(position.position()));
            }
        }

        self.complete(result);
    }

    /// Log the outcome, redraw and publish.
    fn complete(&mut self, result: Result<Transition, SessionError>) {
        match result {
            Ok(Transition::Unchanged) => {}
            Ok(transition) => tracing::debug!(?transition, phase = %self.manager.phase(), "Session transition"),
            Err(e) => log_error(&e),
        }

        let snapshot = self.manager.snapshot();
        let state = self.projector.project(&snapshot);

        self.surface.draw_markers(&state.markers);
        self.surface.draw_overlay(state.overlay_draw().as_ref());
        self.snapshot_tx.send_replace(snapshot);
    }
}

fn log_error(error: &SessionError) {
    match error {
        SessionError::Location(_) => {
            tracing::warn!(kind = error.kind(), error = %error, "Location update failed")
        }
        SessionError::BuildingFetch(_) => {
            tracing::warn!(kind = error.kind(), error = %error, "Building resolution aborted")
        }
        SessionError::FloorFetch(_) => {
            tracing::warn!(kind = error.kind(), error = %error, "Floor list unavailable")
        }
        SessionError::Positioning(_) => {
            tracing::error!(kind = error.kind(), error = %error, "Positioning error")
        }
    }
}
