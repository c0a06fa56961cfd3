//! CLI integration tests
//!
//! Run the built binary and check exit codes and output formats.

mod support;

use std::process::Command;
use support::{get_preflight_binary, MockProvider};

fn preflight() -> Command {
    let mut cmd = Command::new(get_preflight_binary());
    cmd.env_remove("PREFLIGHT_PROVIDERS_FILE")
        .env_remove("PREFLIGHT_PROBE_TIMEOUT")
        .env_remove("PREFLIGHT_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let output = preflight().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("socket"));
    assert!(stdout.contains("probe"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_socket_json_output() {
    let output = preflight()
        .args(["socket", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!value["path"].as_str().unwrap().is_empty());
    assert!(value["source"].is_string());
    assert!(value.get("daemon_reachable").is_none());
}

#[cfg(unix)]
#[test]
fn test_socket_honours_docker_host() {
    let dir = tempfile::TempDir::new().unwrap();
    let socket = dir.path().join("docker.sock");
    let _listener = std::os::unix::net::UnixListener::bind(&socket).unwrap();

    let output = preflight()
        .args(["socket", "--format", "json"])
        .env("DOCKER_HOST", format!("unix://{}", socket.display()))
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["path"], socket.to_string_lossy().as_ref());
    assert_eq!(value["source"], "override");
}

#[test]
fn test_strict_requires_ping() {
    let output = preflight().args(["socket", "--strict"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_probe_without_base_url_fails() {
    let output = preflight()
        .args(["probe", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["result"]["status"], false);
    assert_eq!(value[0]["result"]["message"], "Base URL is required.");
}

#[tokio::test]
async fn test_probe_success_exits_zero() {
    let server = MockProvider::start(200, r#"{"choices":[{"index":0}]}"#).await;
    let base_url = server.base_url.clone();

    let output = tokio::task::spawn_blocking(move || {
        preflight()
            .args(["probe", "--base-url", &base_url, "--format", "human"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available"));
    assert!(stdout.contains("LLM API call succeeded."));
}

#[tokio::test]
async fn test_providers_file_reports_each_entry() {
    let good = MockProvider::start(200, r#"{"candidates":[{}]}"#).await;
    let bad = MockProvider::start(500, "nope").await;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("providers.yaml");
    std::fs::write(
        &path,
        format!(
            "providers:\n  - name: gemini\n    base_url: {}\n    api_key: k\n    provider: gemini\n  - name: local\n    base_url: {}\n",
            good.base_url, bad.base_url
        ),
    )
    .unwrap();

    let output = tokio::task::spawn_blocking(move || {
        preflight()
            .args(["probe", "--format", "json", "--providers"])
            .arg(&path)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["name"], "gemini");
    assert_eq!(value[0]["result"]["status"], true);
    assert_eq!(value[1]["name"], "local");
    assert_eq!(
        value[1]["result"]["message"],
        "LLM API call failed, HTTP status: 500, error: nope"
    );
}

#[test]
fn test_config_json_output() {
    let output = preflight()
        .args(["config", "--format", "json"])
        .env("PREFLIGHT_PROBE_TIMEOUT", "12")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("12"));
}

#[tokio::test]
async fn test_zero_timeout_from_env_is_rejected() {
    let server = MockProvider::start(200, r#"{"choices":[{}]}"#).await;
    let base_url = server.base_url.clone();

    let output = tokio::task::spawn_blocking(move || {
        preflight()
            .args(["probe", "--base-url", &base_url, "--format", "json"])
            .env("PREFLIGHT_PROBE_TIMEOUT", "0")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(server.requests().is_empty());
}

#[test]
fn test_zero_timeout_flag_is_rejected() {
    let output = preflight()
        .args(["probe", "--base-url", "http://127.0.0.1:9", "--timeout", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--timeout"));
}

#[test]
fn test_invalid_config_exits_non_zero() {
    let output = preflight()
        .args(["config", "--format", "json"])
        .env("PREFLIGHT_PROBE_TIMEOUT", "0")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stdout).contains("probe_timeout_secs"));
}
