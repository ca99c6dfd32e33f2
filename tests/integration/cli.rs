//! End-to-end runs of the riskdash binary

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

use super::helpers::{StubBackend, StubResponse, HIGH_RISK_BODY};

/// Run the binary with an empty config file so the user's own config never
/// leaks into a test.
fn riskdash(args: &[&str]) -> Output {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let config: PathBuf = temp.path().join("config.toml");
    std::fs::write(&config, "").expect("Failed to write config");

    Command::new(env!("CARGO_BIN_EXE_riskdash"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run riskdash")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_sample_prints_note() {
    let output = riskdash(&["sample"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Patient: 78 y/o Male"));
}

#[test]
fn test_config_reflects_flags() {
    let output = riskdash(&["config", "--endpoint", "http://model.test:9000", "--settle-ms", "0"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("endpoint = \"http://model.test:9000\""));
    assert!(text.contains("settle_delay_ms = 0"));
    assert!(text.contains("feed_interval_ms = 300"));
}

#[test]
fn test_invalid_endpoint_flag_is_rejected() {
    let output = riskdash(&["config", "--endpoint", "localhost:5000"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("endpoint must be an http(s) URL"));
}

#[test]
fn test_analyze_sample_json() {
    let backend = StubBackend::start(StubResponse::ok(HIGH_RISK_BODY));
    let endpoint = backend.endpoint();
    let output = riskdash(&[
        "analyze",
        "--sample",
        "--no-delay",
        "--json",
        "--endpoint",
        &endpoint,
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["label"], "High Risk");
    assert_eq!(value["probability"], 0.82);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].json()["note"]
        .as_str()
        .unwrap()
        .starts_with("Patient: 78 y/o Male"));
}

#[test]
fn test_analyze_prints_verdict() {
    let backend = StubBackend::start(StubResponse::ok(HIGH_RISK_BODY));
    let endpoint = backend.endpoint();
    let output = riskdash(&["analyze", "--sample", "--no-delay", "--endpoint", &endpoint]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Risk Probability: 0.8200 (82.00%)"));
    assert!(text.contains("Raw Logit Score: 1.5163"));
    assert!(text.contains("Prediction: High Risk (Readmission)"));
}

#[test]
fn test_analyze_failure_exits_nonzero() {
    let backend = StubBackend::start(StubResponse::status(
        500,
        "Internal Server Error",
        r#"{"error": "Internal server error"}"#,
    ));
    let endpoint = backend.endpoint();
    let output = riskdash(&["analyze", "--sample", "--no-delay", "--endpoint", &endpoint]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("API error: Internal Server Error"));
    assert!(err.contains("Verify the prediction server is running"));
}

#[test]
fn test_completions_generate_script() {
    let output = riskdash(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("riskdash"));
}
