//! Headless analysis and configuration layering against a stub backend

use std::sync::Arc;
use std::time::Duration;

use riskdash::commands::analyze::run_analysis;
use riskdash::config::{Config, ConfigOverrides};
use riskdash::feed::{StagedLogFeed, BOOT_SCRIPT};
use riskdash::models::RiskLabel;
use riskdash::predict::HttpPredictor;
use riskdash::session::AnalysisError;
use tempfile::TempDir;

use super::helpers::{StubBackend, StubResponse, HIGH_RISK_BODY, LOW_RISK_BODY};

fn predictor(config: &Config) -> Arc<HttpPredictor> {
    Arc::new(
        HttpPredictor::new(
            &config.endpoint,
            config.connect_timeout(),
            config.response_timeout(),
        )
        .expect("Failed to build predictor"),
    )
}

#[test]
fn test_config_file_and_flags_drive_the_analysis() {
    let file_backend = StubBackend::start(StubResponse::ok(LOW_RISK_BODY));
    let flag_backend = StubBackend::start(StubResponse::ok(HIGH_RISK_BODY));

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "endpoint = \"{}\"\nsettle_delay_ms = 0\nfeed_interval_ms = 50\n",
            file_backend.endpoint()
        ),
    )
    .unwrap();

    // File only.
    let config = Config::load(Some(&path)).unwrap();
    let mut feed = StagedLogFeed::new(config.feed_interval());
    let result = run_analysis(
        predictor(&config),
        config.session_timing(),
        &mut feed,
        "note",
        |_| {},
    )
    .unwrap();
    assert_eq!(result.label, RiskLabel::LowRisk);
    assert_eq!(file_backend.requests().len(), 1);

    // Flags win over the file.
    let overrides = ConfigOverrides {
        endpoint: Some(flag_backend.endpoint()),
        ..ConfigOverrides::default()
    };
    let config = Config::load(Some(&path))
        .unwrap()
        .with_overrides(&overrides)
        .unwrap();
    assert_eq!(config.settle_delay_ms, 0);
    let result = run_analysis(
        predictor(&config),
        config.session_timing(),
        &mut feed,
        "note",
        |_| {},
    )
    .unwrap();
    assert_eq!(result.label, RiskLabel::HighRisk);
    assert_eq!(flag_backend.requests().len(), 1);
    assert_eq!(file_backend.requests().len(), 1);
}

#[test]
fn test_feed_lines_stream_in_order_while_waiting() {
    let backend =
        StubBackend::start(StubResponse::ok(HIGH_RISK_BODY).delayed(Duration::from_millis(500)));
    let config = Config {
        endpoint: backend.endpoint(),
        settle_delay_ms: 0,
        feed_interval_ms: 100,
        ..Config::default()
    };

    let mut feed = StagedLogFeed::new(config.feed_interval());
    let mut lines = Vec::new();
    let result = run_analysis(
        predictor(&config),
        config.session_timing(),
        &mut feed,
        "x",
        |line| lines.push(line.to_string()),
    )
    .unwrap();

    assert_eq!(result.percent(), 82);
    assert!(lines.len() >= 2, "expected feed output, got {lines:?}");
    assert_eq!(lines[..2], BOOT_SCRIPT[..2]);
    assert!(!feed.is_active());
}

#[test]
fn test_failed_analysis_surfaces_typed_error() {
    let backend = StubBackend::start(StubResponse::status(
        500,
        "Internal Server Error",
        r#"{"error": "Internal server error"}"#,
    ));
    let config = Config {
        endpoint: backend.endpoint(),
        settle_delay_ms: 0,
        ..Config::default()
    };

    let mut feed = StagedLogFeed::new(config.feed_interval());
    let err = run_analysis(
        predictor(&config),
        config.session_timing(),
        &mut feed,
        "y",
        |_| {},
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "API error: Internal Server Error");
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::Protocol { status: 500, .. })
    ));
}

#[test]
fn test_result_serializes_for_json_output() {
    let backend = StubBackend::start(StubResponse::ok(HIGH_RISK_BODY));
    let config = Config {
        endpoint: backend.endpoint(),
        settle_delay_ms: 0,
        ..Config::default()
    };

    let mut feed = StagedLogFeed::new(config.feed_interval());
    let result = run_analysis(
        predictor(&config),
        config.session_timing(),
        &mut feed,
        "x",
        |_| {},
    )
    .unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["probability"], 0.82);
    assert_eq!(value["label"], "High Risk");
    assert_eq!(value["logit_score"], 1.5163);
    assert!(value["analyzed_at"].is_string());
}
