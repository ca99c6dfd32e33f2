//! Decorative log feed shown while an analysis is processing.
//!
//! The feed is purely time driven. It does not know when the real response
//! arrives and may still be mid-script, or already finished, when the
//! session leaves `Processing`.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::constants::DEFAULT_FEED_INTERVAL_MS;

/// Scripted status lines, emitted in order.
pub const BOOT_SCRIPT: [&str; 11] = [
    "Booting ClinicalBERT AI core...",
    "Initializing model: discharge_readmission",
    "Loading vocabulary (30,522 tokens)...",
    "Model architecture confirmed: 12-layer, 768-hidden.",
    "Awaiting patient data...",
    "Receiving note... tokenizing input...",
    "Padding and truncating to 512 tokens...",
    "Running analysis through 12 attention heads...",
    "Calculating final logit score...",
    "Applying sigmoid... generating probability...",
    "Analysis complete. Booting results UI...",
];

/// Emits [`BOOT_SCRIPT`] one line per interval while active.
#[derive(Debug, Clone)]
pub struct StagedLogFeed {
    script: &'static [&'static str],
    interval: Duration,
    emitted: Vec<&'static str>,
    /// Next line is due at this instant; `None` when the timer is disarmed.
    next_due: Option<Instant>,
}

impl StagedLogFeed {
    pub fn new(interval: Duration) -> Self {
        Self::with_script(&BOOT_SCRIPT, interval)
    }

    pub fn with_script(script: &'static [&'static str], interval: Duration) -> Self {
        Self {
            script,
            interval,
            emitted: Vec::new(),
            next_due: None,
        }
    }

    /// Start a new run: clear previous lines and arm the timer.
    pub fn activate(&mut self, now: Instant) {
        self.emitted.clear();
        self.next_due = if self.script.is_empty() {
            None
        } else {
            Some(now + self.interval)
        };
        debug!(lines = self.script.len(), "log feed activated");
    }

    /// Disarm the timer. Lines already emitted are kept; nothing more is
    /// appended.
    pub fn deactivate(&mut self) {
        if self.next_due.take().is_some() {
            debug!(emitted = self.emitted.len(), "log feed cancelled");
        }
    }

    /// Append every line that has come due. Returns how many were appended.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut appended = 0;
        while let Some(due) = self.next_due {
            if now < due {
                break;
            }
            self.emitted.push(self.script[self.emitted.len()]);
            appended += 1;

            self.next_due = if self.emitted.len() < self.script.len() {
                Some(due + self.interval)
            } else {
                None
            };
        }
        appended
    }

    pub fn lines(&self) -> &[&'static str] {
        &self.emitted
    }

    /// Timer is armed and more lines are pending.
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.emitted.len() == self.script.len()
    }
}

impl Default for StagedLogFeed {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_FEED_INTERVAL_MS))
    }
}
