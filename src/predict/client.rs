//! Blocking HTTP client for the prediction endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use hyper::ext::ReasonPhrase;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use super::{PredictionRequest, PredictionService};
use crate::models::constants::PREDICT_PATH;
use crate::models::PredictionResponse;
use crate::session::AnalysisError;
use crate::utils::truncate;

/// Header carrying the submission id for log correlation.
pub(crate) const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Longest error body echoed into the debug log.
const MAX_LOGGED_BODY_CHARS: usize = 200;

#[derive(Serialize)]
struct NoteBody<'a> {
    note: &'a str,
}

/// `PredictionService` backed by `POST {endpoint}/predict`.
pub struct HttpPredictor {
    client: Client,
    predict_url: String,
}

impl HttpPredictor {
    /// Create a predictor for `endpoint`.
    /// - connect_timeout: maximum time to establish a TCP connection
    /// - request_timeout: maximum time for the whole exchange, `None` for no limit
    pub fn new(
        endpoint: &str,
        connect_timeout: Duration,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("riskdash/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            predict_url: predict_url(endpoint),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

impl PredictionService for HttpPredictor {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AnalysisError> {
        debug!(
            request_id = %request.id,
            url = %self.predict_url,
            note_chars = request.note.chars().count(),
            "sending prediction request"
        );

        let response = self
            .client
            .post(&self.predict_url)
            .header(REQUEST_ID_HEADER, request.id.to_string())
            .json(&NoteBody {
                note: &request.note,
            })
            .send()
            .map_err(|e| AnalysisError::Transport(error_chain(&e)))?;

        let body = validate_response_status(response)?
            .text()
            .map_err(|e| AnalysisError::Transport(error_chain(&e)))?;
        parse_prediction(&body)
    }
}

/// Join an endpoint base and the predict path without doubling slashes.
pub(crate) fn predict_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), PREDICT_PATH)
}

/// Reject non-success statuses using the status text.
fn validate_response_status(response: Response) -> Result<Response, AnalysisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // hyper only records the phrase when it differs from the canonical one.
    let sent_reason = response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| reason.as_bytes().to_vec());

    let body = response.text().unwrap_or_default();
    warn!(status = status.as_u16(), "prediction endpoint returned an error status");
    debug!(body = %truncate(&body, MAX_LOGGED_BODY_CHARS), "error response body");

    Err(AnalysisError::Protocol {
        status: status.as_u16(),
        status_text: status_text(status, sent_reason.as_deref()),
    })
}

/// Status text as sent by the server, else the canonical reason, else the
/// numeric code.
pub(crate) fn status_text(status: StatusCode, sent_reason: Option<&[u8]>) -> String {
    if let Some(reason) = sent_reason {
        let reason = String::from_utf8_lossy(reason);
        let reason = reason.trim();
        if !reason.is_empty() {
            return reason.to_string();
        }
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

/// Parse a success body into the expected result shape.
pub(crate) fn parse_prediction(body: &str) -> Result<PredictionResponse, AnalysisError> {
    serde_json::from_str(body).map_err(|e| AnalysisError::Payload(e.to_string()))
}

/// Render an error with its source chain, outermost first.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
