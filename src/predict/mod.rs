//! Prediction service boundary.
//!
//! The session only depends on [`PredictionService`]; the HTTP client is one
//! implementation and tests provide their own.

mod client;

pub use client::HttpPredictor;

use uuid::Uuid;

use crate::models::PredictionResponse;
use crate::session::AnalysisError;

/// A snapshot of the note taken at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub id: Uuid,
    pub note: String,
}

impl PredictionRequest {
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            note: note.into(),
        }
    }
}

/// Anything that can turn a note into a risk prediction.
///
/// Implementations block the calling thread; the session runs them on a
/// worker thread.
pub trait PredictionService: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AnalysisError>;
}
