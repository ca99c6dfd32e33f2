//! `riskdash dashboard`: the interactive analyzer.

pub mod ui;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::feed::StagedLogFeed;
use crate::predict::HttpPredictor;
use crate::session::AnalysisSession;
use ui::{run_dashboard, DashboardState};

/// Open the dashboard against the configured prediction service.
pub fn execute(config: &Config) -> Result<()> {
    let predictor = HttpPredictor::new(
        &config.endpoint,
        config.connect_timeout(),
        config.response_timeout(),
    )
    .context("Failed to build prediction client")?;

    let session = AnalysisSession::new(Arc::new(predictor), config.session_timing());
    let state = DashboardState::new(
        session,
        StagedLogFeed::new(config.feed_interval()),
        config.gauge_timing(),
        config.endpoint.clone(),
        Instant::now(),
    );

    run_dashboard(state)
}
