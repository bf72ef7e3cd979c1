use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    NextFilter,
    PrevFilter,
    ClearFilter,
    NextTab,
    PrevTab,
    Press,
    ToggleFavorite,
    AddToCart,
    Reload,
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);

    if keymap.starts_chord(&binding) {
        // gg requires double press
        return if app.pending_key == Some('g') {
            keymap.chord_action().unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    if let Some(action) = keymap.get(&binding) {
        return *action;
    }

    // Some terminals report uppercase letters without the Shift modifier
    match key.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() && key.modifiers == KeyModifiers::NONE => keymap
            .get(&KeyBinding::shift(key.code))
            .copied()
            .unwrap_or(Action::None),
        _ => Action::None,
    }
}
