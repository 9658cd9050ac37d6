//! Run command: play a scenario through a positioning session.
//!
//! Builds the simulated positioning service and location source from the
//! scenario file, starts a [`SessionRunner`] against a logging map surface,
//! plays the scenario steps and prints where the session ended up.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use floormap::config::ConfigFile;
use floormap::overlay::{OverlayProjector, TracingMapSurface};
use floormap::positioning::{SessionRunner, SessionRunnerConfig, SessionSnapshot};
use floormap::simulation::{
    PlaybackSummary, Scenario, ScenarioPlayer, SimulatedLocationSource,
    SimulatedPositioningService,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;

/// How long to wait for the session to register its location watch.
const WATCH_REGISTRATION_TIMEOUT: Duration = Duration::from_secs(2);

const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Arguments for the run command.
pub struct RunArgs {
    pub scenario: PathBuf,
    pub step_interval_ms: Option<u64>,
}

/// Run a scenario to completion or until Ctrl+C.
pub fn run(args: RunArgs, config: &ConfigFile) -> Result<(), CliError> {
    let scenario = Scenario::load(&args.scenario)?;

    let step_interval = args
        .step_interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.simulation.step_interval());

    println!(
        "Scenario: {} ({} buildings, {} floors, {} steps)",
        display_name(&scenario, &args.scenario),
        scenario.buildings.len(),
        scenario.floors.len(),
        scenario.steps.len()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(format!("Failed to create tokio runtime: {}", e)))?;

    let runner_config = SessionRunnerConfig::from_config(config);
    let outcome = runtime.block_on(play(scenario, runner_config, step_interval))?;

    print_outcome(&outcome, &OverlayProjector::new(config.map.building_region_delta));
    Ok(())
}

/// Final state of a played scenario.
struct RunOutcome {
    summary: Option<PlaybackSummary>,
    snapshot: SessionSnapshot,
    live_subscriptions: usize,
    overlay_image: Option<String>,
}

async fn play(
    scenario: Scenario,
    runner_config: SessionRunnerConfig,
    step_interval: Duration,
) -> Result<RunOutcome, CliError> {
    let service = Arc::new(SimulatedPositioningService::from_scenario(&scenario));
    let location = Arc::new(SimulatedLocationSource::new());
    let cancellation = CancellationToken::new();

    let runner = SessionRunner::new(
        Arc::clone(&service),
        Arc::clone(&location),
        TracingMapSurface::new(),
        runner_config,
        cancellation.clone(),
    );
    let snapshots = runner.subscribe();
    let handle = runner.start();

    // Ctrl+C stops playback and the session
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping session");
            signal_token.cancel();
        }
    });

    let deadline = tokio::time::Instant::now() + WATCH_REGISTRATION_TIMEOUT;
    while location.active_watches() == 0 && !handle.is_finished() {
        if tokio::time::Instant::now() >= deadline {
            warn!("Session did not register a location watch in time");
            break;
        }
        tokio::time::sleep(WATCH_POLL_INTERVAL).await;
    }

    let summary = if handle.is_finished() {
        None
    } else {
        let player = ScenarioPlayer::new(Arc::clone(&service), Arc::clone(&location), step_interval);
        tokio::select! {
            summary = player.play(&scenario.steps) => Some(summary),
            _ = cancellation.cancelled() => None,
        }
    };

    // Let the last events drain before tearing down
    if !cancellation.is_cancelled() {
        tokio::time::sleep(step_interval).await;
    }

    // Shutdown clears the session, so read the state it reached first
    let snapshot = snapshots.borrow().clone();
    cancellation.cancel();

    let surface = handle
        .await
        .map_err(|e| CliError::Runtime(format!("Session task failed: {}", e)))??;

    Ok(RunOutcome {
        summary,
        snapshot,
        live_subscriptions: service.live_subscriptions().len(),
        overlay_image: surface.current_image().map(str::to_string),
    })
}

fn display_name(scenario: &Scenario, path: &std::path::Path) -> String {
    if scenario.name.is_empty() {
        path.display().to_string()
    } else {
        scenario.name.clone()
    }
}

fn print_outcome(outcome: &RunOutcome, projector: &OverlayProjector) {
    println!();
    match outcome.summary {
        Some(summary) => println!(
            "Played {} steps ({} delivered, {} without receivers)",
            summary.steps, summary.delivered, summary.undelivered
        ),
        None => println!("Playback interrupted"),
    }

    for line in outcome_lines(&outcome.snapshot, projector) {
        println!("  {}", line);
    }
    println!(
        "  Overlay shown at end: {}",
        outcome.overlay_image.as_deref().unwrap_or("(none)")
    );
    println!("  Live subscriptions after shutdown: {}", outcome.live_subscriptions);
}

/// Human-readable description of the last published session state.
fn outcome_lines(snapshot: &SessionSnapshot, projector: &OverlayProjector) -> Vec<String> {
    let mut lines = vec![format!("Phase: {}", snapshot.phase)];

    if let Some(location) = &snapshot.location {
        lines.push(format!(
            "Last location: {:.6}, {:.6}",
            location.latitude, location.longitude
        ));
    }

    let overlay = projector.project(snapshot);
    if let Some(target) = overlay.camera_target {
        lines.push(format!(
            "Camera target: {:.6}, {:.6}",
            target.latitude, target.longitude
        ));
    }

    match (&snapshot.building, &overlay.image_url) {
        (Some(building), Some(url)) => {
            lines.push(format!("Building: {} ({})", building.id, building.name));
            lines.push(format!(
                "Floor: {}  image {}",
                snapshot.floor_id.as_deref().unwrap_or("?"),
                url
            ));
        }
        (Some(building), None) => {
            lines.push(format!("Building: {} ({})", building.id, building.name));
        }
        (None, _) => lines.push("Building: none".to_string()),
    }

    lines
}
