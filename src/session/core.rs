//! The `AnalysisSession` struct and its submission protocol.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{AnalysisError, SubmitError};
use super::types::Phase;
use crate::models::constants::SAMPLE_NOTE;
use crate::models::{PredictionResponse, RiskResult};
use crate::predict::{PredictionRequest, PredictionService};

/// Timing knobs for the submission protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Minimum time spent in `Processing`, whatever the network latency.
    pub settle_delay: Duration,
    /// Fail with `AnalysisError::Timeout` if no outcome arrives in time.
    /// `None` waits forever.
    pub response_timeout: Option<Duration>,
}

impl Default for SessionTiming {
    fn default() -> Self {
        use crate::models::constants::{DEFAULT_RESPONSE_TIMEOUT_SECS, DEFAULT_SETTLE_DELAY_MS};

        Self {
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            response_timeout: Some(Duration::from_secs(DEFAULT_RESPONSE_TIMEOUT_SECS)),
        }
    }
}

type Outcome = Result<PredictionResponse, AnalysisError>;

/// The single request a session may have outstanding.
///
/// Each submission gets its own channel, so anything received belongs to
/// this request.
struct InFlight {
    id: Uuid,
    /// `None` when the settle delay does not fit in an `Instant`; the gate
    /// then never opens.
    settle_until: Option<Instant>,
    deadline: Option<Instant>,
    timeout: Option<Duration>,
    receiver: Option<Receiver<Outcome>>,
    outcome: Option<Outcome>,
}

impl InFlight {
    /// Pull a finished outcome from the worker, if any.
    fn poll(&mut self, now: Instant) {
        if self.outcome.is_some() {
            return;
        }

        if let Some(receiver) = &self.receiver {
            match receiver.try_recv() {
                Ok(outcome) => {
                    self.outcome = Some(outcome);
                    self.receiver = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.outcome = Some(Err(AnalysisError::Transport(
                        "prediction worker exited without a result".to_string(),
                    )));
                    self.receiver = None;
                }
            }
        }

        if self.outcome.is_none() {
            if let (Some(deadline), Some(timeout)) = (self.deadline, self.timeout) {
                if now >= deadline {
                    self.outcome = Some(Err(AnalysisError::Timeout(timeout)));
                    // A late answer has nowhere to go.
                    self.receiver = None;
                }
            }
        }
    }

    /// The outcome, once the settle gate has passed.
    fn take_ready(&mut self, now: Instant) -> Option<Outcome> {
        match self.settle_until {
            Some(until) if now >= until => self.outcome.take(),
            _ => None,
        }
    }
}

/// Lifecycle of one "run analysis" workflow.
pub struct AnalysisSession {
    service: Arc<dyn PredictionService>,
    timing: SessionTiming,
    phase: Phase,
    note_text: String,
    result: Option<RiskResult>,
    error: Option<AnalysisError>,
    in_flight: Option<InFlight>,
    last_submission: Option<Uuid>,
    torn_down: bool,
}

impl AnalysisSession {
    /// Create an idle session with an empty note.
    pub fn new(service: Arc<dyn PredictionService>, timing: SessionTiming) -> Self {
        Self {
            service,
            timing,
            phase: Phase::Idle,
            note_text: String::new(),
            result: None,
            error: None,
            in_flight: None,
            last_submission: None,
            torn_down: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timing(&self) -> SessionTiming {
        self.timing
    }

    pub fn note_text(&self) -> &str {
        &self.note_text
    }

    /// Mutable access to the note buffer. Editing never affects a request
    /// that is already in flight.
    pub fn note_mut(&mut self) -> &mut String {
        &mut self.note_text
    }

    pub fn set_note_text(&mut self, text: impl Into<String>) {
        self.note_text = text.into();
    }

    /// Present only while `Succeeded`.
    pub fn result(&self) -> Option<&RiskResult> {
        self.result.as_ref()
    }

    /// Present only while `Failed`.
    pub fn error(&self) -> Option<&AnalysisError> {
        self.error.as_ref()
    }

    /// User-facing failure message.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(AnalysisError::user_message)
    }

    /// Id of the most recent submission.
    pub fn last_submission(&self) -> Option<Uuid> {
        self.last_submission
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether the run trigger should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.torn_down && !self.phase.is_processing() && !self.note_text.is_empty()
    }

    /// Submit the current note.
    ///
    /// Enters `Processing` before returning and dispatches exactly one
    /// request carrying a snapshot of the note. The final phase is applied by
    /// [`tick`](Self::tick) once the outcome is known and the settle delay has
    /// elapsed.
    pub fn submit(&mut self, now: Instant) -> Result<Uuid, SubmitError> {
        if self.torn_down {
            return Err(SubmitError::TornDown);
        }
        if self.note_text.is_empty() {
            return Err(SubmitError::EmptyNote);
        }
        if !self.phase.can_transition_to(Phase::Processing) {
            return Err(SubmitError::AlreadyProcessing);
        }

        let request = PredictionRequest::new(self.note_text.clone());
        let id = request.id;

        self.result = None;
        self.error = None;
        self.enter(Phase::Processing);
        self.last_submission = Some(id);

        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let spawned = thread::Builder::new()
            .name("riskdash-predict".to_string())
            .spawn(move || {
                // The session may be gone; that makes this a no-op.
                let _ = tx.send(service.predict(&request));
            });

        let (receiver, outcome) = match spawned {
            Ok(_) => (Some(rx), None),
            Err(e) => (
                None,
                Some(Err(AnalysisError::Transport(format!(
                    "failed to start prediction request: {e}"
                )))),
            ),
        };

        info!(
            request_id = %id,
            settle_ms = self.timing.settle_delay.as_millis() as u64,
            "analysis submitted"
        );

        self.in_flight = Some(InFlight {
            id,
            settle_until: now.checked_add(self.timing.settle_delay),
            // A deadline past the end of the clock is no deadline.
            deadline: self
                .timing
                .response_timeout
                .and_then(|t| now.checked_add(t)),
            timeout: self.timing.response_timeout,
            receiver,
            outcome,
        });

        Ok(id)
    }

    /// Advance the protocol. Returns `true` if the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(flight) = self.in_flight.as_mut() else {
            return false;
        };

        flight.poll(now);
        let Some(outcome) = flight.take_ready(now) else {
            return false;
        };
        let id = flight.id;
        self.in_flight = None;

        match outcome.and_then(RiskResult::from_response) {
            Ok(result) => {
                info!(
                    request_id = %id,
                    probability = result.probability,
                    label = %result.label,
                    "analysis succeeded"
                );
                self.result = Some(result);
                self.enter(Phase::Succeeded);
            }
            Err(err) => {
                warn!(
                    request_id = %id,
                    kind = err.kind(),
                    detail = err.detail().unwrap_or_default(),
                    "analysis failed: {err}"
                );
                self.error = Some(err);
                self.enter(Phase::Failed);
            }
        }

        true
    }

    /// Replace the note with the high-risk sample and clear any payload.
    ///
    /// From a terminal phase this returns to `Idle`. While `Processing` only
    /// the buffer changes; the in-flight snapshot is untouched.
    pub fn load_sample(&mut self) {
        self.note_text = SAMPLE_NOTE.to_string();
        if self.phase.is_processing() {
            return;
        }
        self.result = None;
        self.error = None;
        self.enter(Phase::Idle);
    }

    /// End the session: cancel the settle gate and response deadline and
    /// drop the result channel so a late response is ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(flight) = self.in_flight.take() {
            debug!(request_id = %flight.id, "abandoning in-flight analysis");
        }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid session transition: {} -> {}",
            self.phase,
            next
        );
        if self.phase != next {
            debug!(from = %self.phase, to = %next, "session phase change");
        }
        self.phase = next;
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
