//! Rendering functions for dashboard components.

use std::f64::consts::PI;
use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

use super::state::DashboardState;
use crate::commands::dashboard::ui::theme::{DashColors, Theme};
use crate::gauge::{GaugeAnimator, GAUGE_RADIUS};
use crate::models::{RiskLevel, RiskResult};
use crate::monitor::{WaveformMonitor, GRID_LINES, VIEW_HEIGHT, VIEW_WIDTH};
use crate::session::Phase;

/// Fixed header height (logo plus title row).
pub const HEADER_HEIGHT: u16 = 5;

/// Segments used to draw the gauge arc.
const ARC_STEPS: usize = 120;

/// Canvas half-extent around the gauge.
const GAUGE_VIEW: f64 = 64.0;

/// Render the whole dashboard.
pub fn render_dashboard(frame: &mut Frame, state: &DashboardState, now: Instant, spinner: char) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state.phase());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_note_panel(frame, body[0], state);
    match state.phase() {
        Phase::Idle => render_idle(frame, body[1]),
        Phase::Processing => render_loader(frame, body[1], state, now, spinner),
        Phase::Failed => render_error(frame, body[1], state),
        Phase::Succeeded => render_result(frame, body[1], state, now),
    }

    render_footer(frame, chunks[2], state.notice());
}

/// Logo, title and model badge.
pub fn render_header(frame: &mut Frame, area: Rect, phase: Phase) {
    let mut lines: Vec<Line> = crate::LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l, Theme::header())))
        .collect();

    lines.push(Line::from(vec![
        Span::styled("   Clinical AI Risk Analyzer", Theme::header()),
        Span::raw("  "),
        Span::styled("\u{25CF} MODEL ONLINE", Theme::online()),
        Span::styled(format!("  [{phase}]"), Theme::dimmed()),
    ]));

    frame.render_widget(Paragraph::new(lines), area);
}

/// Note editor with the run trigger in its bottom border.
pub fn render_note_panel(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let session = state.session();
    let trigger = if session.phase().is_processing() {
        Span::styled(" Analyzing... ", Theme::processing())
    } else {
        Span::styled(" Ctrl+R Run Analysis ", Theme::trigger(session.can_submit()))
    };

    let block = Block::default()
        .title(" Clinical Note ")
        .title_style(Theme::header())
        .title_bottom(Line::from(trigger).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);

    let note = session.note_text();
    let text: Vec<Line> = if note.is_empty() {
        vec![Line::from(Span::styled(
            "Paste or type a discharge note, or press Ctrl+L to load a sample.",
            Theme::dimmed(),
        ))]
    } else {
        let mut lines: Vec<Line> = note.split('\n').map(|l| Line::from(l.to_string())).collect();
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled("\u{258F}", Theme::processing()));
        }
        lines
    };

    // Keep the end of the note, where typing happens, in view.
    let height = wrapped_height(note, inner.width);
    let scroll = height.saturating_sub(inner.height);

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

pub fn render_idle(frame: &mut Frame, area: Rect) {
    let block = results_block(" Results ", Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let top = inner.height.saturating_sub(2) / 2;
    let mut lines = vec![Line::default(); top as usize];
    lines.push(Line::from(Span::styled("AWAITING INPUT", Theme::header())).centered());
    lines.push(
        Line::from(Span::styled(
            "Results will appear here after analysis",
            Theme::dimmed(),
        ))
        .centered(),
    );
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Staged log feed with a blinking caret on the newest line.
pub fn render_loader(
    frame: &mut Frame,
    area: Rect,
    state: &DashboardState,
    now: Instant,
    spinner: char,
) {
    let block = results_block(&format!(" {spinner} Analyzing "), Theme::processing());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let caret = if state.caret_visible(now) { "\u{2588}" } else { " " };
    let emitted = state.feed().lines();

    let mut lines: Vec<Line> = emitted
        .iter()
        .map(|l| Line::from(Span::styled(format!("> {l}"), Theme::processing())))
        .collect();
    match lines.last_mut() {
        Some(last) => last.push_span(Span::styled(format!(" {caret}"), Theme::processing())),
        None => lines.push(Line::from(Span::styled(
            format!("> {caret}"),
            Theme::processing(),
        ))),
    }

    // Newest lines stay visible on short terminals.
    let skip = lines.len().saturating_sub(inner.height as usize);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

pub fn render_error(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = results_block(" Analysis Failed ", Style::default().fg(DashColors::ERROR));
    let message = state.session().error_message().unwrap_or_default();

    let lines = vec![
        Line::from(vec![
            Span::styled("Error: ", Theme::error()),
            Span::styled(message, Theme::error()),
        ]),
        Line::default(),
        Line::from(Span::styled(
            format!(
                "Verify the prediction server is running and reachable at {}.",
                state.endpoint()
            ),
            Theme::dimmed(),
        )),
        Line::from(Span::styled(
            "Your note is kept; press Ctrl+R to try again.",
            Theme::dimmed(),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Gauge, verdict and waveform for a succeeded analysis.
pub fn render_result(frame: &mut Frame, area: Rect, state: &DashboardState, now: Instant) {
    let (Some(result), Some(gauge), Some(monitor)) =
        (state.session().result(), state.gauge(), state.monitor())
    else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(7),
        ])
        .split(area);

    render_gauge(frame, chunks[0], gauge, now);
    render_verdict(frame, chunks[1], result);
    render_monitor(frame, chunks[2], monitor, now);
}

/// Radial gauge. Color comes from the probability, not the label.
pub fn render_gauge(frame: &mut Frame, area: Rect, gauge: &GaugeAnimator, now: Instant) {
    let block = results_block(" Readmission Risk ", Theme::border());
    let inner = block.inner(area);

    let color = Theme::risk_color(gauge.risk_level());
    let fill = gauge.fill_ratio(now);
    let label = gauge.percent_label();
    let arc = arc_points(fill);

    // Terminal cells are about twice as tall as they are wide.
    let half_y = GAUGE_VIEW;
    let half_x = if inner.height == 0 {
        GAUGE_VIEW
    } else {
        (GAUGE_VIEW * f64::from(inner.width) / (2.0 * f64::from(inner.height))).max(GAUGE_VIEW)
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-half_x, half_x])
        .y_bounds([-half_y, half_y])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: GAUGE_RADIUS,
                color: DashColors::TRACK,
            });
            ctx.layer();
            for pair in arc.windows(2) {
                let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
            }
            let offset = label.chars().count() as f64 * half_x / f64::from(inner.width.max(1));
            ctx.print(-offset, 0.0, Span::styled(label.clone(), Theme::risk(gauge.risk_level())));
        });

    frame.render_widget(canvas, area);
}

fn render_verdict(frame: &mut Frame, area: Rect, result: &RiskResult) {
    // Verdict text trusts the label sent by the service.
    let level = RiskLevel::from(result.label);
    let block = results_block(" Verdict ", Style::default().fg(Theme::risk_color(level)));

    let strength = if level.is_high() { "HIGH" } else { "LOW" };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Assessment: ", Theme::header()),
            Span::styled(
                format!("{} ({})", result.label, result.label.outcome()),
                Theme::risk(level),
            ),
        ]),
        Line::from(format!(
            "Model classified this note with a {strength} probability of 30-day readmission."
        )),
    ];
    if let Some(logit) = result.logit_score {
        lines.push(Line::from(Span::styled(
            format!("Logit score: {logit:.4}"),
            Theme::dimmed(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_monitor(frame: &mut Frame, area: Rect, monitor: &WaveformMonitor, now: Instant) {
    let block = results_block(" Patient Monitor ", Theme::border());
    let color = pulse_color(Theme::risk_color(monitor.level()), monitor.intensity(now));
    let segments: Vec<_> = monitor.segments().collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, VIEW_WIDTH])
        .y_bounds([0.0, VIEW_HEIGHT])
        .paint(move |ctx| {
            for y in GRID_LINES {
                ctx.draw(&CanvasLine::new(
                    0.0,
                    VIEW_HEIGHT - y,
                    VIEW_WIDTH,
                    VIEW_HEIGHT - y,
                    DashColors::GRID,
                ));
            }
            ctx.layer();
            for &((x1, y1), (x2, y2)) in &segments {
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
            }
        });

    frame.render_widget(canvas, area);
}

/// Key hints, or the pending notice.
pub fn render_footer(frame: &mut Frame, area: Rect, notice: Option<&str>) {
    let line = if let Some(notice) = notice {
        Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(vec![
            Span::styled("Ctrl+R/F5", Theme::key()),
            Span::raw(" run \u{2502} "),
            Span::styled("Ctrl+L/F2", Theme::key()),
            Span::raw(" sample \u{2502} "),
            Span::styled("Ctrl+U", Theme::key()),
            Span::raw(" clear \u{2502} "),
            Span::styled("Esc", Theme::key()),
            Span::raw(" quit"),
        ])
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn results_block(title: &str, border: Style) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .title_style(Theme::header())
        .borders(Borders::ALL)
        .border_style(border)
}

/// Points along the filled part of the arc, clockwise from twelve o'clock.
fn arc_points(fill: f64) -> Vec<(f64, f64)> {
    let steps = (fill.clamp(0.0, 1.0) * ARC_STEPS as f64).ceil() as usize;
    if steps == 0 {
        return Vec::new();
    }
    (0..=steps)
        .map(|i| {
            let t = fill * i as f64 / steps as f64;
            let angle = PI / 2.0 - 2.0 * PI * t;
            (GAUGE_RADIUS * angle.cos(), GAUGE_RADIUS * angle.sin())
        })
        .collect()
}

/// Scale an RGB color by the pulse intensity.
fn pulse_color(color: Color, intensity: f64) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (f64::from(c) * intensity).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}

/// Rows needed to show `text` wrapped at `width` columns.
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}
