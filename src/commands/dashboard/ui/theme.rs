use ratatui::style::{Color, Modifier, Style};

use crate::models::RiskLevel;

/// Color scheme for the dashboard
pub struct DashColors;

impl DashColors {
    // Verdict hues
    pub const HIGH_RISK: Color = Color::Rgb(239, 68, 68);
    pub const LOW_RISK: Color = Color::Rgb(34, 197, 94);

    // Phase accents
    pub const PROCESSING: Color = Color::Cyan;
    pub const ERROR: Color = Color::Red;
    pub const ONLINE: Color = Color::Green;

    // UI chrome
    pub const HEADER: Color = Color::White;
    pub const DIMMED: Color = Color::DarkGray;
    pub const BORDER: Color = Color::Gray;
    pub const GRID: Color = Color::Rgb(40, 60, 60);
    pub const TRACK: Color = Color::Rgb(55, 65, 81);
}

/// Theme provides pre-built styles
pub struct Theme;

impl Theme {
    pub fn header() -> Style {
        Style::default().fg(DashColors::HEADER).add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(DashColors::DIMMED)
    }

    pub fn border() -> Style {
        Style::default().fg(DashColors::BORDER)
    }

    pub fn online() -> Style {
        Style::default().fg(DashColors::ONLINE).add_modifier(Modifier::BOLD)
    }

    pub fn processing() -> Style {
        Style::default().fg(DashColors::PROCESSING)
    }

    pub fn error() -> Style {
        Style::default().fg(DashColors::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn key() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Enabled or disabled run trigger.
    pub fn trigger(enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(Color::Black)
                .bg(DashColors::PROCESSING)
                .add_modifier(Modifier::BOLD)
        } else {
            Self::dimmed()
        }
    }

    pub fn risk_color(level: RiskLevel) -> Color {
        match level {
            RiskLevel::High => DashColors::HIGH_RISK,
            RiskLevel::Low => DashColors::LOW_RISK,
        }
    }

    pub fn risk(level: RiskLevel) -> Style {
        Style::default()
            .fg(Self::risk_color(level))
            .add_modifier(Modifier::BOLD)
    }
}
