//! Full-screen dashboard.
//!
//! Layout:
//! - Header with logo, title and model badge
//! - Note editor (left) with the run trigger in its border
//! - Results panel (right): idle prompt, staged log feed, error panel, or
//!   gauge, verdict and waveform monitor
//! - Footer with key hints or the pending notice

mod app;
mod event_handler;
mod renderer;
mod state;

use anyhow::Result;

pub use app::DashboardApp;
pub use event_handler::{action_for_key, DashboardAction};
pub use state::DashboardState;

/// Entry point for the dashboard.
pub fn run_dashboard(state: DashboardState) -> Result<()> {
    let mut app = DashboardApp::new(state)?;
    app.run()
}
