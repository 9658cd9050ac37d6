//! Scenario-driven simulation of the external services.
//!
//! [`SimulatedPositioningService`] and [`SimulatedLocationSource`] implement
//! the positioning and location seams in memory. [`ScenarioPlayer`] plays a
//! [`Scenario`]'s steps against both, pausing between steps so a running
//! session can react.

mod location;
mod scenario;
mod service;

pub use location::SimulatedLocationSource;
pub use scenario::{Scenario, ScenarioError, ScenarioStep};
pub use service::{ServiceCall, ServiceFaults, SimulatedPositioningService};

use std::sync::Arc;
use std::time::Duration;

use crate::positioning::{
    Fix, LocationError, PositioningError, PositioningEvent, PositioningUpdate,
};

/// Default pause between scenario steps.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(500);

/// Counts from one playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Steps played.
    pub steps: usize,
    /// Steps that reached at least one receiver.
    pub delivered: usize,
    /// Event steps nobody was listening for.
    pub undelivered: usize,
}

/// Plays scenario steps against the simulated services.
pub struct ScenarioPlayer {
    service: Arc<SimulatedPositioningService>,
    location: Arc<SimulatedLocationSource>,
    step_interval: Duration,
}

impl ScenarioPlayer {
    pub fn new(
        service: Arc<SimulatedPositioningService>,
        location: Arc<SimulatedLocationSource>,
        step_interval: Duration,
    ) -> Self {
        Self {
            service,
            location,
            step_interval,
        }
    }

    /// Play every step in order.
    ///
    /// Sleeps `step_interval` after each event step; `wait` steps sleep for
    /// their own duration instead.
    pub async fn play(&self, steps: &[ScenarioStep]) -> PlaybackSummary {
        let mut summary = PlaybackSummary::default();

        for (index, step) in steps.iter().enumerate() {
            summary.steps += 1;

            if let ScenarioStep::Wait { millis } = step {
                tracing::debug!(index, millis, "Scenario wait");
                tokio::time::sleep(Duration::from_millis(*millis)).await;
                continue;
            }

            let delivered = self.play_step(step).await;
            if delivered > 0 {
                summary.delivered += 1;
            } else {
                summary.undelivered += 1;
                tracing::debug!(index, step = step.name(), "Scenario step had no receivers");
            }
            tracing::trace!(index, step = step.name(), delivered, "Scenario step played");

            tokio::time::sleep(self.step_interval).await;
        }

        tracing::info!(
            steps = summary.steps,
            delivered = summary.delivered,
            undelivered = summary.undelivered,
            "Scenario playback finished"
        );
        summary
    }

    /// Play one step without pausing.
    ///
    /// Returns the number of receivers the event reached.
    pub async fn play_step(&self, step: &ScenarioStep) -> usize {
        match step {
            ScenarioStep::Location {
                latitude,
                longitude,
                heading,
                accuracy,
            } => {
                self.location
                    .emit_fix(*latitude, *longitude, *heading, *accuracy)
                    .await
            }
            ScenarioStep::LocationError { message } => {
                self.location
                    .emit(Err(LocationError::Unavailable(message.clone())))
                    .await
            }
            ScenarioStep::Indoor {
                latitude,
                longitude,
                bearing,
                floor_id,
                accuracy,
            } => {
                let fix = Fix::from_indoor(*latitude, *longitude, *bearing, *accuracy);
                self.service
                    .emit(PositioningEvent::Update(PositioningUpdate::Indoor {
                        fix,
                        floor_id: floor_id.clone(),
                    }))
                    .await
            }
            ScenarioStep::Outdoor => {
                self.service
                    .emit(PositioningEvent::Update(PositioningUpdate::Outdoor))
                    .await
            }
            ScenarioStep::Status { message } => {
                self.service
                    .emit(PositioningEvent::Status(message.clone()))
                    .await
            }
            ScenarioStep::Error { message } => {
                self.service
                    .emit(PositioningEvent::Error(PositioningError::Service(
                        message.clone(),
                    )))
                    .await
            }
            ScenarioStep::Wait { .. } => 0,
        }
    }
}
