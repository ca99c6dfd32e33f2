//! Radial risk gauge animation.
//!
//! A gauge is mounted fresh for every result. It starts empty (offset equal
//! to the full circumference) and a single deferred update, fired shortly
//! after mount, starts an ease-out transition towards the target offset.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::constants::{DEFAULT_GAUGE_DEFER_MS, DEFAULT_GAUGE_DURATION_MS};
use crate::models::{percent, RiskLevel};

/// Radius of the gauge arc in view units.
pub const GAUGE_RADIUS: f64 = 52.0;

/// Length of the full arc; also the offset of an empty gauge.
pub const CIRCUMFERENCE: f64 = 2.0 * PI * GAUGE_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeTiming {
    /// Delay between mount and the deferred update.
    pub defer: Duration,
    /// Length of the transition window.
    pub duration: Duration,
}

impl Default for GaugeTiming {
    fn default() -> Self {
        Self {
            defer: Duration::from_millis(DEFAULT_GAUGE_DEFER_MS),
            duration: Duration::from_millis(DEFAULT_GAUGE_DURATION_MS),
        }
    }
}

/// Animated arc offset for one probability.
#[derive(Debug, Clone)]
pub struct GaugeAnimator {
    probability: f64,
    timing: GaugeTiming,
    /// Pending deferred update; `None` once fired or cancelled.
    pending_update: Option<Instant>,
    /// When the offset started moving towards the target.
    transition_started: Option<Instant>,
}

impl GaugeAnimator {
    /// Mount a gauge for `probability` and schedule its deferred update.
    pub fn mount(probability: f64, timing: GaugeTiming, now: Instant) -> Self {
        Self {
            probability,
            timing,
            pending_update: Some(now + timing.defer),
            transition_started: None,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::classify(self.probability)
    }

    /// `round(probability * 100)%`.
    pub fn percent_label(&self) -> String {
        format!("{}%", percent(self.probability))
    }

    /// Offset the arc settles at.
    pub fn target_offset(&self) -> f64 {
        CIRCUMFERENCE - self.probability * CIRCUMFERENCE
    }

    /// Fire the deferred update when due. Returns `true` on the tick it fires.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_update {
            Some(due) if now >= due => {
                self.pending_update = None;
                self.transition_started = Some(due);
                debug!(target_offset = self.target_offset(), "gauge transition started");
                true
            }
            _ => false,
        }
    }

    /// Offset currently displayed.
    pub fn displayed_offset(&self, now: Instant) -> f64 {
        let Some(started) = self.transition_started else {
            return CIRCUMFERENCE;
        };

        let progress = if self.timing.duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(started).as_secs_f64();
            (elapsed / self.timing.duration.as_secs_f64()).min(1.0)
        };

        CIRCUMFERENCE + (self.target_offset() - CIRCUMFERENCE) * ease_out(progress)
    }

    /// Filled fraction of the arc, 0.0 to 1.0.
    pub fn fill_ratio(&self, now: Instant) -> f64 {
        (1.0 - self.displayed_offset(now) / CIRCUMFERENCE).clamp(0.0, 1.0)
    }

    /// True once the transition has fully played out.
    pub fn is_settled(&self, now: Instant) -> bool {
        match self.transition_started {
            Some(started) => now.saturating_duration_since(started) >= self.timing.duration,
            None => false,
        }
    }

    pub fn has_pending_update(&self) -> bool {
        self.pending_update.is_some()
    }

    /// Cancel the deferred update if it has not fired yet.
    pub fn teardown(&mut self) {
        self.pending_update = None;
    }
}

/// Cubic ease-out over `t` in [0, 1].
fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
