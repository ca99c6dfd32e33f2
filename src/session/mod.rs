//! Analysis session state machine.
//!
//! One `AnalysisSession` lives for the whole dashboard run. It owns the note
//! buffer, the current phase and its payload, and the single in-flight
//! prediction request.

mod core;
mod error;
mod transitions;
mod types;

#[cfg(test)]
mod tests;

pub use self::core::{AnalysisSession, SessionTiming};
pub use error::{AnalysisError, SubmitError};
pub use types::Phase;
