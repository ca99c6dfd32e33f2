//! Dashboard application and main loop.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use super::event_handler::{handle_key_event, handle_paste, KeyEventResult};
use super::renderer::render_dashboard;
use super::state::DashboardState;

/// Poll timeout for event loop (100ms for responsive UI).
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Dashboard application.
pub struct DashboardApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    running: Arc<AtomicBool>,
    state: DashboardState,
    spinner_frame: usize,
    paste_enabled: bool,
    exiting: bool,
    /// Flag to prevent double cleanup in Drop.
    cleaned_up: bool,
}

impl DashboardApp {
    /// Take over the terminal.
    pub fn new(state: DashboardState) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

        crate::utils::install_crossterm_panic_hook();

        let paste_enabled = execute!(stdout, EnableBracketedPaste).is_ok();

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            running: Arc::new(AtomicBool::new(true)),
            state,
            spinner_frame: 0,
            paste_enabled,
            exiting: false,
            cleaned_up: false,
        })
    }

    /// Run until the user quits.
    pub fn run(&mut self) -> Result<()> {
        // Raw mode turns Ctrl+C into a key event; this covers SIGTERM and
        // signals sent from outside the terminal.
        let running = self.running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
            crate::utils::cleanup_terminal_crossterm();
            std::process::exit(0);
        })
        .context("Failed to set Ctrl+C handler")?;

        info!(endpoint = self.state.endpoint(), "dashboard started");
        let result = self.run_event_loop();

        self.state.teardown();
        self.cleanup_terminal();
        info!("dashboard closed");

        result
    }

    fn run_event_loop(&mut self) -> Result<()> {
        while self.running.load(Ordering::SeqCst) {
            if self.exiting {
                break;
            }

            if event::poll(POLL_TIMEOUT)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match handle_key_event(
                            key.code,
                            key.modifiers,
                            &mut self.state,
                            Instant::now(),
                        ) {
                            KeyEventResult::Exit => self.exiting = true,
                            KeyEventResult::Continue => {}
                        }
                    }
                    Event::Paste(text) => handle_paste(&text, &mut self.state),
                    _ => {}
                }
            }

            self.state.tick(Instant::now());
            self.spinner_frame = (self.spinner_frame + 1) % 10;

            self.render()?;
        }

        Ok(())
    }

    /// Leave the alternate screen and disable raw mode.
    fn cleanup_terminal(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;

        let _ = disable_raw_mode();
        if self.paste_enabled {
            let _ = execute!(self.terminal.backend_mut(), DisableBracketedPaste);
        }
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }

    fn render(&mut self) -> Result<()> {
        let spinner = self.spinner_char();
        let now = Instant::now();
        let state = &self.state;

        self.terminal
            .draw(|frame| render_dashboard(frame, state, now, spinner))?;

        Ok(())
    }

    fn spinner_char(&self) -> char {
        const SPINNER: [char; 10] = [
            '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}',
            '\u{2827}', '\u{2807}', '\u{280F}',
        ];
        SPINNER[self.spinner_frame % SPINNER.len()]
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        self.state.teardown();
        self.cleanup_terminal();
    }
}
