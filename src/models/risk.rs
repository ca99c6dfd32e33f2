use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constants::HIGH_RISK_THRESHOLD;
use crate::session::AnalysisError;

/// Verdict label as sent by the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::HighRisk => "High Risk",
            RiskLabel::LowRisk => "Low Risk",
        }
    }

    /// Readmission outcome shown next to the verdict.
    pub fn outcome(&self) -> &'static str {
        match self {
            RiskLabel::HighRisk => "Readmission",
            RiskLabel::LowRisk => "No Readmission",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling class computed from a probability, independent of the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Classify a probability. The boundary is strict: 0.5 is low risk.
    pub fn classify(probability: f64) -> Self {
        if probability > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl From<RiskLabel> for RiskLevel {
    fn from(label: RiskLabel) -> Self {
        match label {
            RiskLabel::HighRisk => RiskLevel::High,
            RiskLabel::LowRisk => RiskLevel::Low,
        }
    }
}

/// Success body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub probability: f64,
    pub label: RiskLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_score: Option<f64>,
}

/// A validated prediction held by a succeeded session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub probability: f64,
    pub label: RiskLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_score: Option<f64>,
    pub analyzed_at: DateTime<Utc>,
}

impl RiskResult {
    /// Validate a wire response. The probability must be finite and in [0, 1].
    pub fn from_response(response: PredictionResponse) -> Result<Self, AnalysisError> {
        let probability = response.probability;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(AnalysisError::Payload(format!(
                "probability {probability} is outside [0, 1]"
            )));
        }

        Ok(Self {
            probability,
            label: response.label,
            logit_score: response.logit_score,
            analyzed_at: Utc::now(),
        })
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::classify(self.probability)
    }

    /// `round(probability * 100)` as shown on the gauge.
    pub fn percent(&self) -> u8 {
        percent(self.probability)
    }
}

/// Rounded percentage for a probability in [0, 1].
pub fn percent(probability: f64) -> u8 {
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}
