//! Event handling for dashboard keyboard input.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyModifiers};

use super::state::DashboardState;

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Quit,
    Submit,
    LoadSample,
    ClearNote,
    Insert(char),
    Newline,
    Backspace,
    Ignore,
}

/// Result of handling a key event.
pub enum KeyEventResult {
    /// User requested exit.
    Exit,
    /// Continue running.
    Continue,
}

/// Map a key press to an action.
pub fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> DashboardAction {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Esc => DashboardAction::Quit,
        KeyCode::Char('c') if ctrl => DashboardAction::Quit,
        KeyCode::Char('r') if ctrl => DashboardAction::Submit,
        KeyCode::F(5) => DashboardAction::Submit,
        KeyCode::Char('l') if ctrl => DashboardAction::LoadSample,
        KeyCode::F(2) => DashboardAction::LoadSample,
        KeyCode::Char('u') if ctrl => DashboardAction::ClearNote,

        // Unbound control chords never reach the note.
        KeyCode::Char(_) if ctrl || modifiers.contains(KeyModifiers::ALT) => {
            DashboardAction::Ignore
        }
        KeyCode::Char(c) => DashboardAction::Insert(c),
        KeyCode::Tab => DashboardAction::Insert('\t'),
        KeyCode::Enter => DashboardAction::Newline,
        KeyCode::Backspace => DashboardAction::Backspace,

        _ => DashboardAction::Ignore,
    }
}

/// Handle keyboard events for editing and control.
pub fn handle_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &mut DashboardState,
    now: Instant,
) -> KeyEventResult {
    match action_for_key(code, modifiers) {
        DashboardAction::Quit => return KeyEventResult::Exit,
        DashboardAction::Submit => state.submit(now),
        DashboardAction::LoadSample => state.load_sample(now),
        DashboardAction::ClearNote => state.clear_note(),
        DashboardAction::Insert(c) => state.insert_char(c),
        DashboardAction::Newline => state.insert_char('\n'),
        DashboardAction::Backspace => state.backspace(),
        DashboardAction::Ignore => {}
    }
    KeyEventResult::Continue
}

/// Paste events go straight into the note.
pub fn handle_paste(text: &str, state: &mut DashboardState) {
    for c in text.chars() {
        // Terminals send CRLF line breaks in pastes.
        if c != '\r' {
            state.insert_char(c);
        }
    }
}
