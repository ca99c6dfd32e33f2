use std::time::Duration;

use thiserror::Error;

/// Why a prediction attempt ended in `Phase::Failed`.
///
/// Every kind collapses into the same failed phase; `Display` is the message
/// shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error: {status_text}")]
    Protocol { status: u16, status_text: String },

    /// The body did not match the expected result shape.
    #[error("An unknown error occurred.")]
    Payload(String),

    /// No outcome arrived before the response deadline.
    #[error("Prediction service did not respond within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl AnalysisError {
    /// Short kind name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Protocol { .. } => "protocol",
            AnalysisError::Payload(_) => "payload",
            AnalysisError::Timeout(_) => "timeout",
        }
    }

    /// The single string shown in the error panel.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Diagnostic detail that is not part of the user message.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AnalysisError::Payload(detail) => Some(detail),
            _ => None,
        }
    }
}

/// A submission rejected at the boundary. The phase is left unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("note is empty")]
    EmptyNote,

    #[error("an analysis is already in progress")]
    AlreadyProcessing,

    #[error("session has been torn down")]
    TornDown,
}
