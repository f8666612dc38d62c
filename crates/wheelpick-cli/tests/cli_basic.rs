//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory
//! so config commands never touch the real user config.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_wheelpick-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("WHEELPICK_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn write_script(dir: &Path, json: &str) -> String {
    let path = dir.join("script.json");
    std::fs::write(&path, json).unwrap();
    path.to_string_lossy().into_owned()
}

const PM_SCRIPT: &str = r#"{
    "picker": "block_time",
    "initial": [11, 30, "AM"],
    "gestures": [
        { "type": "tap", "column": "period", "value": "PM", "at": 0 },
        { "type": "settle" }
    ]
}"#;

#[test]
fn test_simulate_prints_replay_json() {
    let home = tempfile::tempdir().unwrap();
    let script = write_script(home.path(), PM_SCRIPT);
    let (stdout, stderr, code) = run_cli(home.path(), &["simulate", &script]);
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let replay: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(replay["at_rest"], true);
    assert_eq!(replay["commit"], serde_json::json!([11, 30, "PM"]));
    let settled = replay["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["type"] == "settled")
        .count();
    assert_eq!(settled, 1);
}

#[test]
fn test_simulate_commit_only() {
    let home = tempfile::tempdir().unwrap();
    let script = write_script(home.path(), PM_SCRIPT);
    let (stdout, _, code) = run_cli(home.path(), &["simulate", &script, "--commit-only"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "11 30 PM");
}

#[test]
fn test_simulate_rejects_unknown_column() {
    let home = tempfile::tempdir().unwrap();
    let script = write_script(
        home.path(),
        r#"{ "picker": "timer", "gestures": [ { "type": "drag_start", "column": "period", "at": 0 } ] }"#,
    );
    let (_, stderr, code) = run_cli(home.path(), &["simulate", &script]);
    assert_eq!(code, 1);
    assert!(stderr.contains("period"), "stderr was: {stderr}");
}

#[test]
fn test_inspect_default_block_time() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["inspect", "block-time"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("commit: 09 00 AM"), "stdout was: {stdout}");
}

#[test]
fn test_inspect_json_with_offset() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["inspect", "duration", "--column", "hour", "--offset", "40", "--json"],
    );
    assert_eq!(code, 0);
    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let hour = &reports[0];
    assert_eq!(hour["name"], "hour");
    // Slot 1 sits in the leading margin and is rehomed one cycle forward.
    assert_eq!(hour["offset"], 40.0 + 24.0 * 40.0);
    assert_eq!(hour["rehome"], "none");
    assert_eq!(hour["visible"].as_array().unwrap().len(), 5);
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "minute_step", "5"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "minute_step"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "5");
    assert!(home.path().join(".config/wheelpick/config.toml").exists());
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "minute_step", "7"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("minute_step"), "stderr was: {stderr}");
}

#[test]
fn test_config_get_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}
