use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Key has no binding.
    None,
    /// Start a voice conversation (Enter or `s`).
    Start,
    /// Leave the application (`q`, Esc, Ctrl-C, Ctrl-D).
    Quit,
}

/// Map a terminal key event to an action.
pub fn handle_key(event: &KeyEvent) -> InputAction {
    // Some terminals report releases too; only act on presses.
    if event.kind == KeyEventKind::Release {
        return InputAction::None;
    }
    match event.code {
        KeyCode::Char('c' | 'd') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::Quit
        }
        KeyCode::Enter | KeyCode::Char('s') => InputAction::Start,
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        _ => InputAction::None,
    }
}
