//! Heartbeat waveform shown next to a verdict.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use crate::models::{RiskLabel, RiskLevel};

/// View box of the trace.
pub const VIEW_WIDTH: f64 = 200.0;
pub const VIEW_HEIGHT: f64 = 60.0;

/// Horizontal grid lines behind the trace.
pub const GRID_LINES: [f64; 5] = [10.0, 20.0, 30.0, 40.0, 50.0];

/// EKG polyline in view coordinates (y grows downwards).
pub const TRACE: [(f64, f64); 8] = [
    (0.0, 30.0),
    (70.0, 30.0),
    (75.0, 20.0),
    (80.0, 45.0),
    (85.0, 30.0),
    (90.0, 35.0),
    (95.0, 30.0),
    (200.0, 30.0),
];

const HIGH_RISK_PULSE: Duration = Duration::from_millis(800);
const LOW_RISK_PULSE: Duration = Duration::from_millis(1_500);

/// Lowest intensity reached in a pulse cycle.
const MIN_INTENSITY: f64 = 0.5;

/// Pulsing waveform whose cadence follows the verdict label.
#[derive(Debug, Clone)]
pub struct WaveformMonitor {
    level: RiskLevel,
    mounted_at: Instant,
}

impl WaveformMonitor {
    pub fn for_label(label: RiskLabel, now: Instant) -> Self {
        Self {
            level: label.into(),
            mounted_at: now,
        }
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }

    /// High risk pulses faster.
    pub fn pulse_period(&self) -> Duration {
        if self.level.is_high() {
            HIGH_RISK_PULSE
        } else {
            LOW_RISK_PULSE
        }
    }

    /// Trace brightness in [0.5, 1.0]: full at the start of a cycle, dimmest
    /// half way through.
    pub fn intensity(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.mounted_at).as_secs_f64();
        let cycle = (elapsed / self.pulse_period().as_secs_f64()).fract();
        let swing = (1.0 - MIN_INTENSITY) / 2.0;
        MIN_INTENSITY + swing + swing * (2.0 * PI * cycle).cos()
    }

    /// Whether the trace is in the bright half of its cycle.
    pub fn is_bright(&self, now: Instant) -> bool {
        self.intensity(now) >= (1.0 + MIN_INTENSITY) / 2.0
    }

    /// Trace segments with y flipped so that up is positive.
    pub fn segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> {
        let trace: &'static [(f64, f64)] = &TRACE;
        trace.windows(2).map(|pair| {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];
            ((x1, VIEW_HEIGHT - y1), (x2, VIEW_HEIGHT - y2))
        })
    }
}
