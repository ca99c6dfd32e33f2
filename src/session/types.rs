/// Lifecycle phase of an analysis session.
///
/// State machine transitions:
/// - `Idle` -> `Processing` (note submitted)
/// - `Processing` -> `Succeeded` | `Failed` (outcome arrived and settle gate passed)
/// - `Succeeded` | `Failed` -> `Processing` (re-submission)
/// - `Succeeded` | `Failed` -> `Idle` (sample loaded, payload cleared)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the user to submit a note.
    Idle,

    /// A request is in flight or the settle gate has not passed yet.
    Processing,

    /// A validated result is available.
    Succeeded,

    /// The request failed; an error message is available.
    Failed,
}

impl Phase {
    /// Terminal phases accept a new submission.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, Phase::Processing)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Processing => write!(f, "Processing"),
            Phase::Succeeded => write!(f, "Succeeded"),
            Phase::Failed => write!(f, "Failed"),
        }
    }
}
