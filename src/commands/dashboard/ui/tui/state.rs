//! State types for the dashboard.
//!
//! `DashboardState` owns the analysis session and the view-side components
//! derived from it. The feed is armed for each new submission, and a fresh
//! gauge and monitor are mounted for each new result.

use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::feed::StagedLogFeed;
use crate::gauge::{GaugeAnimator, GaugeTiming};
use crate::monitor::WaveformMonitor;
use crate::session::{AnalysisSession, Phase, SubmitError};

/// Caret blink half-period in the loader.
const CARET_BLINK: Duration = Duration::from_millis(500);

/// Notice shown when the run trigger is used with an empty note.
pub const EMPTY_NOTE_NOTICE: &str = "Enter a clinical note before running the analysis";

pub struct DashboardState {
    session: AnalysisSession,
    feed: StagedLogFeed,
    gauge: Option<GaugeAnimator>,
    monitor: Option<WaveformMonitor>,
    gauge_timing: GaugeTiming,
    endpoint: String,
    /// Submission the feed was last armed for.
    feed_submission: Option<Uuid>,
    /// Submission the gauge and monitor were mounted for.
    mounted_submission: Option<Uuid>,
    notice: Option<String>,
    started_at: Instant,
}

impl DashboardState {
    pub fn new(
        session: AnalysisSession,
        feed: StagedLogFeed,
        gauge_timing: GaugeTiming,
        endpoint: impl Into<String>,
        now: Instant,
    ) -> Self {
        Self {
            session,
            feed,
            gauge: None,
            monitor: None,
            gauge_timing,
            endpoint: endpoint.into(),
            feed_submission: None,
            mounted_submission: None,
            notice: None,
            started_at: now,
        }
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn feed(&self) -> &StagedLogFeed {
        &self.feed
    }

    pub fn gauge(&self) -> Option<&GaugeAnimator> {
        self.gauge.as_ref()
    }

    pub fn monitor(&self) -> Option<&WaveformMonitor> {
        self.monitor.as_ref()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether the loader caret is in its visible half-period.
    pub fn caret_visible(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_millis() / CARET_BLINK.as_millis()) % 2 == 0
    }

    pub fn insert_char(&mut self, c: char) {
        self.session.note_mut().push(c);
        self.notice = None;
    }

    pub fn backspace(&mut self) {
        self.session.note_mut().pop();
    }

    pub fn clear_note(&mut self) {
        self.session.note_mut().clear();
    }

    /// Run trigger. Rejections leave everything as it was.
    pub fn submit(&mut self, now: Instant) {
        match self.session.submit(now) {
            Ok(_) => {
                self.notice = None;
                self.sync(now);
            }
            Err(SubmitError::EmptyNote) => {
                self.notice = Some(EMPTY_NOTE_NOTICE.to_string());
            }
            Err(e) => debug!("submit ignored: {e}"),
        }
    }

    pub fn load_sample(&mut self, now: Instant) {
        self.session.load_sample();
        self.notice = None;
        self.sync(now);
    }

    /// Advance every timer and reconcile the view with the session phase.
    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
        self.sync(now);

        let appended = self.feed.tick(now);
        if appended > 0 {
            debug!(appended, total = self.feed.lines().len(), "log feed advanced");
        }
        if let Some(gauge) = self.gauge.as_mut() {
            gauge.tick(now);
        }
    }

    /// Stop the session and cancel every pending timer.
    pub fn teardown(&mut self) {
        self.session.teardown();
        self.feed.deactivate();
        self.unmount_result();
    }

    fn sync(&mut self, now: Instant) {
        let submission = self.session.last_submission();

        match self.session.phase() {
            Phase::Processing => {
                if self.feed_submission != submission {
                    self.feed.activate(now);
                    self.feed_submission = submission;
                }
                self.unmount_result();
            }
            Phase::Succeeded => {
                self.feed.deactivate();
                if self.mounted_submission != submission || self.gauge.is_none() {
                    self.mount_result(submission, now);
                }
            }
            Phase::Idle | Phase::Failed => {
                self.feed.deactivate();
                self.unmount_result();
            }
        }
    }

    fn mount_result(&mut self, submission: Option<Uuid>, now: Instant) {
        let Some(result) = self.session.result() else {
            return;
        };
        self.gauge = Some(GaugeAnimator::mount(
            result.probability,
            self.gauge_timing,
            now,
        ));
        self.monitor = Some(WaveformMonitor::for_label(result.label, now));
        self.mounted_submission = submission;
        debug!(probability = result.probability, "result view mounted");
    }

    fn unmount_result(&mut self) {
        if let Some(mut gauge) = self.gauge.take() {
            gauge.teardown();
        }
        self.monitor = None;
        self.mounted_submission = None;
    }
}
