//! Integration tests for the `tplock` CLI binary.
//!
//! Argument parsing, config errors, and schedule validation run without a
//! router; the device commands run against a wiremock router.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tplock` binary with env isolation.
fn tplock_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tplock");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("TPLOCK_CONFIG")
        .env_remove("TPLOCK_ROUTER_IP")
        .env_remove("TPLOCK_PASSWORD")
        .env_remove("TPLOCK_TIMEOUT")
        .env_remove("TPLOCK_LOG_DIR");
    cmd
}

fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_router() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error_code": 0, "stok": "tok123" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/stok=tok123/ds"))
        .and(body_partial_json(json!({ "method": "get" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error_code": 0,
            "hosts_info": {
                "host_info": [
                    { "host_info_0": { "mac": "AA-BB-CC-DD-EE-01", "hostname": "kids-tablet", "ip": "192.168.1.20", "blocked": "0" } },
                    { "host_info_1": { "mac": "AA-BB-CC-DD-EE-02", "hostname": "living-room-tv", "ip": "192.168.1.22", "blocked": "1" } }
                ]
            }
        })))
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = tplock_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    tplock_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("devices")
            .and(predicate::str::contains("block"))
            .and(predicate::str::contains("daemon")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    tplock_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tplock"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_config_exits_with_config_code() {
    let home = TempDir::new().unwrap();
    let output = tplock_cmd(home.path()).arg("devices").output().unwrap();
    assert_eq!(output.status.code(), Some(9));
    assert!(combined_output(&output).contains("not found"));
}

#[test]
fn test_missing_password_exits_with_auth_code() {
    let home = TempDir::new().unwrap();
    let config = write_json(&home, "config.json", &json!({ "router_ip": "127.0.0.1:9" }));

    let output = tplock_cmd(home.path())
        .args(["--config", config.to_str().unwrap(), "devices"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unreachable_router_is_login_failure() {
    let home = TempDir::new().unwrap();
    let config = write_json(
        &home,
        "config.json",
        &json!({ "router_ip": "127.0.0.1:9", "password": "admin", "timeout": 1 }),
    );

    let output = tplock_cmd(home.path())
        .args(["--config", config.to_str().unwrap(), "block", "--name", "tv"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("login failed"));
}

// ── Schedule validation ─────────────────────────────────────────────

#[test]
fn test_schedule_lists_valid_tasks() {
    let home = TempDir::new().unwrap();
    let schedule = write_json(
        &home,
        "schedule_config.json",
        &json!({ "tasks": [
            { "name": "bedtime", "device_name": "tablet", "action": "block", "cron": "0 22 * * *" },
            { "name": "paused", "device_name": "tv", "action": "block", "cron": "0 7 * * *", "enabled": false }
        ]}),
    );

    tplock_cmd(home.path())
        .args(["schedule", schedule.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("bedtime").and(predicate::str::contains("0 22 * * *")))
        .stderr(predicate::str::contains("paused"));
}

#[test]
fn test_schedule_reports_invalid_task() {
    let home = TempDir::new().unwrap();
    let schedule = write_json(
        &home,
        "schedule_config.json",
        &json!({ "tasks": [
            { "name": "bedtime", "device_name": "tablet", "action": "block", "cron": "0 22 * * *" },
            { "name": "typo", "device_name": "tablet", "action": "disable", "cron": "0 7 * * *" }
        ]}),
    );

    let output = tplock_cmd(home.path())
        .args(["schedule", schedule.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
    let text = combined_output(&output);
    assert!(text.contains("bedtime"));
    assert!(text.contains("typo"));
}

#[test]
fn test_schedule_wrong_typed_task_is_reported_alone() {
    let home = TempDir::new().unwrap();
    let schedule = write_json(
        &home,
        "schedule_config.json",
        &json!({ "tasks": [
            { "name": "bedtime", "device_name": "tablet", "action": "block", "cron": "0 22 * * *" },
            { "name": "typo", "device_mac": null, "device_name": "tv", "action": "block", "cron": 5 }
        ]}),
    );

    let output = tplock_cmd(home.path())
        .args(["schedule", schedule.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
    assert!(String::from_utf8_lossy(&output.stdout).contains("bedtime"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed entry"));
}

#[test]
fn test_daemon_missing_schedule_fails_fast() {
    let home = TempDir::new().unwrap();
    let config = write_json(&home, "config.json", &json!({ "password": "admin" }));

    let output = tplock_cmd(home.path())
        .args([
            "--config",
            config.to_str().unwrap(),
            "daemon",
            "--no-log-file",
            home.path().join("missing.json").to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
}

// ── Against a mock router ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_devices_prints_table() {
    let server = mock_router().await;
    let home = TempDir::new().unwrap();
    let config = write_json(
        &home,
        "config.json",
        &json!({ "router_ip": server.uri(), "password": "admin" }),
    );

    let mut cmd = tplock_cmd(home.path());
    cmd.args(["--config", config.to_str().unwrap(), "devices"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kids-tablet"));
    assert!(stdout.contains("living-room-tv"));
    assert!(stdout.contains("blocked"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_block_by_name() {
    let server = mock_router().await;
    Mock::given(method("POST"))
        .and(path("/stok=tok123/ds"))
        .and(body_partial_json(json!({
            "method": "do",
            "hosts_info": { "set_block_flag": { "mac": "AA-BB-CC-DD-EE-01", "is_blocked": "1" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error_code": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let config = write_json(
        &home,
        "config.json",
        &json!({ "router_ip": server.uri(), "password": "admin" }),
    );

    let mut cmd = tplock_cmd(home.path());
    cmd.args(["--config", config.to_str().unwrap(), "block", "--name", "tablet"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Blocked kids-tablet"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_device_exits_with_not_found() {
    let server = mock_router().await;
    let home = TempDir::new().unwrap();
    let config = write_json(
        &home,
        "config.json",
        &json!({ "router_ip": server.uri(), "password": "admin" }),
    );

    let mut cmd = tplock_cmd(home.path());
    cmd.args(["--config", config.to_str().unwrap(), "unblock", "--mac", "FF-FF-FF-FF-FF-FF"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
}
