//! Storefront key bindings
//!
//! Bindings come from `[keymap]` in the config file and use Vim-style
//! notation: `j`, `G`, `<C-d>`, `<S-Tab>`, `<CR>`. The only multi-key
//! sequence understood is `gg`, which is resolved by the input layer
//! through [`Keymap::chord_action`].

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use tracing::warn;

use vitrine_core::config::KeymapConfig;

use crate::input::Action;

/// A key plus the modifiers held with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// What a notation string turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notation {
    Key(KeyBinding),
    /// `gg`
    DoubleG,
}

/// Names accepted inside `<...>`, compared case-insensitively
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("cr", KeyCode::Enter),
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("space", KeyCode::Char(' ')),
    ("bs", KeyCode::Backspace),
    ("backspace", KeyCode::Backspace),
    ("del", KeyCode::Delete),
    ("insert", KeyCode::Insert),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pgup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("pgdn", KeyCode::PageDown),
];

/// Lookup table from key presses to storefront actions
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Action bound to `gg`, if any
    chord: Option<Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Build the keymap from config.
    ///
    /// Unparseable entries are skipped with a warning. When two actions
    /// claim the same key the one listed first wins.
    pub fn from_config(config: &KeymapConfig) -> Self {
        let configured = [
            ("quit", &config.quit, Action::Quit),
            ("move_down", &config.move_down, Action::MoveDown),
            ("move_up", &config.move_up, Action::MoveUp),
            ("scroll_half_down", &config.scroll_half_down, Action::ScrollHalfPageDown),
            ("scroll_half_up", &config.scroll_half_up, Action::ScrollHalfPageUp),
            ("jump_to_top", &config.jump_to_top, Action::JumpToTop),
            ("jump_to_bottom", &config.jump_to_bottom, Action::JumpToBottom),
            ("next_filter", &config.next_filter, Action::NextFilter),
            ("prev_filter", &config.prev_filter, Action::PrevFilter),
            ("clear_filter", &config.clear_filter, Action::ClearFilter),
            ("next_tab", &config.next_tab, Action::NextTab),
            ("prev_tab", &config.prev_tab, Action::PrevTab),
            ("press", &config.press, Action::Press),
            ("toggle_favorite", &config.toggle_favorite, Action::ToggleFavorite),
            ("add_to_cart", &config.add_to_cart, Action::AddToCart),
            ("reload", &config.reload, Action::Reload),
        ];

        let mut keymap = Self {
            bindings: HashMap::new(),
            chord: None,
        };

        for (field, notation, action) in configured {
            match parse_notation(notation) {
                Some(Notation::DoubleG) => match keymap.chord {
                    Some(existing) => warn!(
                        "keymap.{} = {:?} is already bound to {:?}, ignoring",
                        field, notation, existing
                    ),
                    None => keymap.chord = Some(action),
                },
                Some(Notation::Key(binding)) => match keymap.bindings.get(&binding) {
                    Some(existing) => warn!(
                        "keymap.{} = {:?} is already bound to {:?}, ignoring",
                        field, notation, existing
                    ),
                    None => {
                        keymap.bindings.insert(binding, action);
                    }
                },
                None => warn!("keymap.{} = {:?} is not a valid key, ignoring", field, notation),
            }
        }

        // Ctrl+C always quits; arrows and Esc only fill unclaimed keys
        keymap.bindings.insert(
            KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Action::Quit,
        );
        let fallbacks = [
            (KeyCode::Up, Action::MoveUp),
            (KeyCode::Down, Action::MoveDown),
            (KeyCode::Left, Action::PrevFilter),
            (KeyCode::Right, Action::NextFilter),
            (KeyCode::Esc, Action::ExitMode),
        ];
        for (code, action) in fallbacks {
            keymap
                .bindings
                .entry(KeyBinding::new(code, KeyModifiers::NONE))
                .or_insert(action);
        }

        keymap
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// True when `binding` is a bare `g` and `gg` is bound
    pub fn starts_chord(&self, binding: &KeyBinding) -> bool {
        self.chord.is_some()
            && binding.code == KeyCode::Char('g')
            && binding.modifiers == KeyModifiers::NONE
    }

    pub fn chord_action(&self) -> Option<Action> {
        self.chord
    }
}

fn parse_notation(notation: &str) -> Option<Notation> {
    if notation == "gg" {
        return Some(Notation::DoubleG);
    }

    if let Some(inner) = notation.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        return parse_bracketed(inner).map(Notation::Key);
    }

    let mut chars = notation.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    Some(Notation::Key(char_binding(c, KeyModifiers::NONE)))
}

/// Parse the inside of `<...>`: any of `C-`, `S-`, `A-`/`M-` followed by a
/// key name or a single character
fn parse_bracketed(inner: &str) -> Option<KeyBinding> {
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = inner;
    loop {
        let (Some(prefix), Some(tail)) = (rest.get(..2), rest.get(2..)) else {
            break;
        };
        let modifier = match prefix.to_ascii_uppercase().as_str() {
            "C-" => KeyModifiers::CONTROL,
            "S-" => KeyModifiers::SHIFT,
            "A-" | "M-" => KeyModifiers::ALT,
            _ => break,
        };
        modifiers |= modifier;
        rest = tail;
    }

    let mut chars = rest.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(char_binding(c, modifiers));
    }

    let name = rest.to_ascii_lowercase();
    let code = match name.strip_prefix('f').map(str::parse::<u8>) {
        Some(Ok(n)) if (1..=12).contains(&n) => KeyCode::F(n),
        _ => NAMED_KEYS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, code)| *code)?,
    };

    // Terminals report Shift+Tab as BackTab
    let code = match code {
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        code => code,
    };
    Some(KeyBinding::new(code, modifiers))
}

/// Shifted letters are stored uppercase with SHIFT, the way crossterm
/// reports them
fn char_binding(c: char, modifiers: KeyModifiers) -> KeyBinding {
    let shifted = modifiers.contains(KeyModifiers::SHIFT);
    if modifiers.contains(KeyModifiers::CONTROL) && !shifted {
        KeyBinding::new(KeyCode::Char(c.to_ascii_lowercase()), modifiers)
    } else if c.is_ascii_uppercase() || (shifted && c.is_ascii_lowercase()) {
        KeyBinding::new(KeyCode::Char(c.to_ascii_uppercase()), modifiers | KeyModifiers::SHIFT)
    } else {
        KeyBinding::new(KeyCode::Char(c), modifiers)
    }
}
