use crate::ui::core::input::Event;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Maps a terminal event onto the loop's event type. Focus and paste
/// notifications have no counterpart and are dropped.
pub fn into_ui_event(event: crossterm::event::Event) -> Option<Event> {
    match event {
        crossterm::event::Event::Key(key) => Some(Event::Key(normalize_key(key))),
        crossterm::event::Event::Mouse(mouse) => Some(Event::Mouse(mouse)),
        crossterm::event::Event::Resize(w, h) => Some(Event::Resize(w, h)),
        crossterm::event::Event::FocusGained
        | crossterm::event::Event::FocusLost
        | crossterm::event::Event::Paste(_) => None,
    }
}

/// Some terminals report Ctrl+Space as NUL and Shift+Tab as a plain Tab with
/// the shift bit; both are folded into one spelling.
pub fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    match key.code {
        KeyCode::Null => {
            key.code = KeyCode::Char(' ');
            key.modifiers |= KeyModifiers::CONTROL;
        }
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            key.code = KeyCode::BackTab;
        }
        _ => {}
    }
    key
}

#[cfg(test)]
#[path = "../../tests/unit/tui/crossterm.rs"]
mod tests;
