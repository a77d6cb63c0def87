//! Key bindings for the user-facing controls

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key that opens one voice-capture window
pub const PUSH_TO_TALK: char = 'v';

/// A user action read from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Start one voice-capture cycle
    PushToTalk,
    /// Tear everything down
    Quit,
}

impl ControlEvent {
    /// Map a key press to a control, ignoring releases and repeats
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Esc => Some(ControlEvent::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(ControlEvent::Quit)
            }
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                PUSH_TO_TALK => Some(ControlEvent::PushToTalk),
                'q' => Some(ControlEvent::Quit),
                _ => None,
            },
            _ => None,
        }
    }
}
