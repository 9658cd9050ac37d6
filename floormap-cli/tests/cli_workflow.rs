//! End-to-end tests for the `floormap` binary.
//!
//! Each test points `HOME` at a temporary directory so the config file and
//! log file never touch the real user profile.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn demo_scenario() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("demos/tokyo_walk.json")
}

fn run_cli(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_floormap"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_resolve_nearest_building() {
    let home = TempDir::new().unwrap();
    let scenario = demo_scenario();

    let output = run_cli(
        home.path(),
        &[
            "resolve",
            "--buildings",
            scenario.to_str().unwrap(),
            "--lat",
            "35.6799",
            "--lon",
            "139.7688",
        ],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).starts_with("yaesu-south  Yaesu South Annex"));
}

#[test]
fn test_resolve_rejects_invalid_latitude() {
    let home = TempDir::new().unwrap();
    let scenario = demo_scenario();

    let output = run_cli(
        home.path(),
        &[
            "resolve",
            "--buildings",
            scenario.to_str().unwrap(),
            "--lat",
            "91",
            "--lon",
            "0",
        ],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid argument"));
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();

    let output = run_cli(home.path(), &["config", "init"]);
    assert!(output.status.success());
    assert!(home.path().join(".floormap/config.ini").exists());

    let output = run_cli(
        home.path(),
        &["config", "set", "session.event_channel_capacity", "128"],
    );
    assert!(output.status.success());

    let output = run_cli(home.path(), &["config", "get", "session.event_channel_capacity"]);
    assert_eq!(stdout(&output).trim(), "128");
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let home = TempDir::new().unwrap();

    let output = run_cli(
        home.path(),
        &["config", "set", "session.event_channel_capacity", "0"],
    );

    assert!(!output.status.success());
    assert!(!home.path().join(".floormap/config.ini").exists());
}

#[test]
fn test_run_demo_scenario() {
    let home = TempDir::new().unwrap();
    let scenario = demo_scenario();

    let output = run_cli(
        home.path(),
        &["run", scenario.to_str().unwrap(), "--step-interval-ms", "20"],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("Played 9 steps"));
    assert!(text.contains("Building: yaesu-south (Yaesu South Annex)"));
    assert!(text.contains("image https://maps.example.test/yaesu-south/1.png"));
    assert!(text.contains("Live subscriptions after shutdown: 0"));
    assert!(home.path().join(".floormap/floormap.log").exists());
}
