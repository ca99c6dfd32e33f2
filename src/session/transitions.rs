use super::types::Phase;

impl Phase {
    /// Check if moving from the current phase to `next` is legal.
    ///
    /// Unlike a plain status, staying in `Processing` is not a no-op: a second
    /// submission while one is in flight is rejected.
    pub fn can_transition_to(&self, next: Phase) -> bool {
        match self {
            Phase::Idle => matches!(next, Phase::Idle | Phase::Processing),
            Phase::Processing => matches!(next, Phase::Succeeded | Phase::Failed),
            Phase::Succeeded | Phase::Failed => {
                matches!(next, Phase::Processing | Phase::Idle)
            }
        }
    }

    /// Returns the phases reachable from this one.
    pub fn valid_transitions(&self) -> Vec<Phase> {
        match self {
            Phase::Idle => vec![Phase::Idle, Phase::Processing],
            Phase::Processing => vec![Phase::Succeeded, Phase::Failed],
            Phase::Succeeded | Phase::Failed => vec![Phase::Processing, Phase::Idle],
        }
    }
}
