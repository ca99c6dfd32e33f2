pub mod theme;
pub mod tui;

pub use theme::{DashColors, Theme};
pub use tui::{run_dashboard, DashboardState};
