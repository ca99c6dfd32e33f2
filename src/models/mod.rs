pub mod constants;
pub mod risk;

pub use risk::{percent, PredictionResponse, RiskLabel, RiskLevel, RiskResult};
