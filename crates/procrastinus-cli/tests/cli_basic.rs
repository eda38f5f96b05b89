//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_procrastinus-cli"))
        .args(args)
        .env("PROCRASTINUS_DATA_DIR", data_dir)
        .env("PROCRASTINUS_USER", "tester@u.nus.edu")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed {args:?}: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_shop_list() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = run_json(dir.path(), &["shop", "list"]);
    let ids: Vec<_> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect();
    assert!(ids.contains(&"rice".to_string()));
}

#[test]
fn test_buy_without_coins_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["shop", "buy", "rice"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Not enough coins"));
}

#[test]
fn test_pet_status_creates_pet() {
    let dir = tempfile::tempdir().unwrap();
    let pet = run_json(dir.path(), &["pet", "status"]);
    assert_eq!(pet["hunger"], 100);
    assert_eq!(pet["level"], 0);

    let renamed = run_json(dir.path(), &["pet", "rename", "Mochi"]);
    assert_eq!(renamed["name"], "Mochi");
}

#[test]
fn test_timer_start_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let started = run_json(dir.path(), &["timer", "start", "--minutes", "25"]);
    assert_eq!(started["events"][0]["type"], "TimerStarted");
    assert_eq!(started["timer"]["state"], "running");

    let (_, _, code) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 1, "second start must be refused");

    let given_up = run_json(dir.path(), &["timer", "give-up"]);
    assert_eq!(given_up["events"][0]["type"], "SessionFinished");
    assert_eq!(given_up["outcome"]["reward"]["recordable"], false);
    assert_eq!(given_up["timer"]["state"], "idle");
}

#[test]
fn test_short_countdown_needs_force() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["timer", "start", "--minutes", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--force"));
    let (_, _, code) = run_cli(dir.path(), &["timer", "start", "--minutes", "301"]);
    assert_eq!(code, 1);
    run_json(dir.path(), &["timer", "start", "--minutes", "3", "--force"]);
}

#[test]
fn test_task_shows_on_calendar_day() {
    let dir = tempfile::tempdir().unwrap();
    let task = run_json(
        dir.path(),
        &["task", "add", "Lab report", "--date", "2024-10-02", "--start", "19", "--end", "21"],
    );
    assert_eq!(task["title"], "Lab report");

    let day = run_json(dir.path(), &["calendar", "day", "--date", "2024-10-02"]);
    assert_eq!(day["label"], "Week 8");
    assert_eq!(day["boxes"][0]["event"]["title"], "Lab report");

    let list = run_json(dir.path(), &["task", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "pet.hunger_threshold"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "50");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "pet.hunger_threshold", "40"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "pet.hunger_threshold"]);
    assert_eq!(stdout.trim(), "40");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "pet.nope", "1"]);
    assert_eq!(code, 1);
}
