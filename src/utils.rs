use std::io::{self, Write};
use std::sync::Once;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};

/// ANSI escape codes for terminal control
const CURSOR_SHOW: &str = "\x1B[?25h";
const ATTR_RESET: &str = "\x1B[0m";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Leave raw mode and the alternate screen, show the cursor.
///
/// Safe to call when the terminal was never switched; errors are ignored.
pub fn cleanup_terminal_crossterm() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
    let _ = stdout.write_all(format!("{CURSOR_SHOW}{ATTR_RESET}").as_bytes());
    let _ = stdout.flush();
}

/// Install a panic hook that restores the terminal before the default
/// handler prints the panic. Only installs once.
pub fn install_crossterm_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            cleanup_terminal_crossterm();
            default_hook(panic_info);
        }));
    });
}

/// Truncate a string safely by character count, not byte count.
/// This ensures we don't break UTF-8 encoding by cutting mid-character.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
