//! Session scenarios against the HTTP predictor and a stub backend

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use riskdash::models::{RiskLabel, RiskLevel};
use riskdash::predict::HttpPredictor;
use riskdash::session::{AnalysisError, AnalysisSession, Phase, SessionTiming};

use super::helpers::{
    refused_endpoint, run_to_completion, StubBackend, StubResponse, HIGH_RISK_BODY,
    LOW_RISK_BODY,
};

fn session_for(endpoint: &str, timing: SessionTiming) -> AnalysisSession {
    let predictor = HttpPredictor::new(endpoint, Duration::from_secs(2), None)
        .expect("Failed to build predictor");
    AnalysisSession::new(Arc::new(predictor), timing)
}

fn no_settle() -> SessionTiming {
    SessionTiming {
        settle_delay: Duration::ZERO,
        response_timeout: Some(Duration::from_secs(5)),
    }
}

#[test]
fn test_high_risk_note_succeeds() {
    let backend = StubBackend::start(StubResponse::ok(HIGH_RISK_BODY));
    let mut session = session_for(&backend.endpoint(), no_settle());
    session.set_note_text("x");

    session.submit(Instant::now()).unwrap();
    assert_eq!(session.phase(), Phase::Processing);
    assert_eq!(run_to_completion(&mut session), Phase::Succeeded);

    let result = session.result().unwrap();
    assert_eq!(result.label, RiskLabel::HighRisk);
    assert_eq!(result.percent(), 82);
    assert_eq!(result.risk_level(), RiskLevel::High);
    assert_eq!(result.logit_score, Some(1.5163));
    assert!(session.error().is_none());
}

#[test]
fn test_request_shape() {
    let backend = StubBackend::start(StubResponse::ok(LOW_RISK_BODY));
    let mut session = session_for(&format!("{}/", backend.endpoint()), no_settle());
    session.set_note_text("Pt discharged home.\nFollow up in 2 weeks.");

    let id = session.submit(Instant::now()).unwrap();
    run_to_completion(&mut session);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/predict");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("x-request-id"), Some(id.to_string().as_str()));
    assert_eq!(
        request.json(),
        serde_json::json!({ "note": "Pt discharged home.\nFollow up in 2 weeks." })
    );
}

#[test]
fn test_server_error_fails_with_status_text() {
    let backend = StubBackend::start(StubResponse::status(
        500,
        "Internal Server Error",
        r#"{"error": "Internal server error"}"#,
    ));
    let mut session = session_for(&backend.endpoint(), no_settle());
    session.set_note_text("y");

    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);

    let message = session.error_message().unwrap();
    assert!(message.contains("Internal Server Error"));
    assert_eq!(message, "API error: Internal Server Error");
    assert!(matches!(
        session.error(),
        Some(AnalysisError::Protocol { status: 500, .. })
    ));
    assert!(session.result().is_none());
    assert_eq!(session.note_text(), "y");
}

#[test]
fn test_bad_request_uses_status_text() {
    let backend = StubBackend::start(StubResponse::status(
        400,
        "Bad Request",
        r#"{"error": "No 'note' text provided"}"#,
    ));
    let mut session = session_for(&backend.endpoint(), no_settle());
    session.set_note_text(" ");

    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);
    assert_eq!(session.error_message().unwrap(), "API error: Bad Request");
}

#[test]
fn test_custom_reason_phrase_is_kept() {
    let backend = StubBackend::start(StubResponse::status(503, "Model Loading", "{}"));
    let mut session = session_for(&backend.endpoint(), no_settle());
    session.set_note_text("x");

    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);
    assert_eq!(session.error_message().unwrap(), "API error: Model Loading");
    assert!(matches!(
        session.error(),
        Some(AnalysisError::Protocol { status: 503, .. })
    ));
}

#[test]
fn test_connection_refused_is_transport_failure() {
    let mut session = session_for(&refused_endpoint(), no_settle());
    session.set_note_text("z");

    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);

    let err = session.error().unwrap();
    assert_eq!(err.kind(), "transport");
    assert!(!err.user_message().is_empty());
}

#[test]
fn test_malformed_body_is_payload_failure() {
    let backend = StubBackend::start(StubResponse::ok("<html>not json</html>"));
    let mut session = session_for(&backend.endpoint(), no_settle());
    session.set_note_text("x");

    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);

    let err = session.error().unwrap();
    assert_eq!(err.kind(), "payload");
    assert_eq!(err.user_message(), "An unknown error occurred.");
    assert!(err.detail().is_some());
}

#[test]
fn test_unknown_label_is_payload_failure() {
    let backend = StubBackend::start(StubResponse::ok(
        r#"{"probability": 0.4, "label": "Medium Risk"}"#,
    ));
    let mut session = session_for(&backend.endpoint(), no_settle());
    session.set_note_text("x");

    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);
    assert_eq!(session.error().unwrap().kind(), "payload");
}

#[test]
fn test_settle_gate_holds_fast_response() {
    let backend = StubBackend::start(StubResponse::ok(HIGH_RISK_BODY));
    let timing = SessionTiming {
        settle_delay: Duration::from_millis(400),
        response_timeout: None,
    };
    let mut session = session_for(&backend.endpoint(), timing);
    session.set_note_text("x");

    let submitted = Instant::now();
    session.submit(submitted).unwrap();

    // Wait until the response is certainly available.
    let started = Instant::now();
    while backend.requests().is_empty() {
        assert!(started.elapsed() < Duration::from_secs(5));
        thread::sleep(Duration::from_millis(5));
    }
    thread::sleep(Duration::from_millis(100));

    assert!(!session.tick(submitted + Duration::from_millis(399)));
    assert_eq!(session.phase(), Phase::Processing);

    let started = Instant::now();
    while !session.tick(submitted + Duration::from_millis(400)) {
        assert!(started.elapsed() < Duration::from_secs(5));
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(session.phase(), Phase::Succeeded);
}

#[test]
fn test_hung_backend_hits_response_deadline() {
    let backend =
        StubBackend::start(StubResponse::ok(HIGH_RISK_BODY).delayed(Duration::from_secs(3)));
    let timing = SessionTiming {
        settle_delay: Duration::ZERO,
        response_timeout: Some(Duration::from_millis(200)),
    };
    let mut session = session_for(&backend.endpoint(), timing);
    session.set_note_text("x");

    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);
    assert!(matches!(session.error(), Some(AnalysisError::Timeout(_))));
}

#[test]
fn test_resubmit_after_failure_sends_new_request() {
    let failing = StubBackend::start(StubResponse::status(503, "Service Unavailable", "{}"));
    let mut session = session_for(&failing.endpoint(), no_settle());
    session.set_note_text("x");
    session.submit(Instant::now()).unwrap();
    assert_eq!(run_to_completion(&mut session), Phase::Failed);
    assert_eq!(
        session.error_message().unwrap(),
        "API error: Service Unavailable"
    );

    session.submit(Instant::now()).unwrap();
    assert!(session.error().is_none());
    assert_eq!(run_to_completion(&mut session), Phase::Failed);
    assert_eq!(failing.requests().len(), 2);
}

#[test]
fn test_late_response_after_teardown_is_ignored() {
    let backend =
        StubBackend::start(StubResponse::ok(HIGH_RISK_BODY).delayed(Duration::from_millis(200)));
    let mut session = session_for(&backend.endpoint(), no_settle());
    session.set_note_text("x");

    session.submit(Instant::now()).unwrap();
    session.teardown();
    thread::sleep(Duration::from_millis(400));

    assert!(!session.tick(Instant::now()));
    assert_eq!(session.phase(), Phase::Processing);
    assert!(session.result().is_none());
}
