//! Dracula theme
//! https://draculatheme.com/

use vitrine_core::Color;

use crate::theme::Theme;

/// Dracula default theme
pub fn default() -> Theme {
    Theme {
        bg: Color::rgb(0x28, 0x2a, 0x36),          // Background
        surface: Color::rgb(0x21, 0x22, 0x2c),     // Current Line (darker)
        surface_alt: Color::rgb(0x44, 0x47, 0x5a), // Selection
        border: Color::rgb(0x62, 0x72, 0xa4),      // Comment
        fg: Color::rgb(0xf8, 0xf8, 0xf2),          // Foreground
        muted: Color::rgb(0x7a, 0x7c, 0x8d),
        accent: Color::rgb(0xbd, 0x93, 0xf9),    // Purple
        on_accent: Color::rgb(0x28, 0x2a, 0x36),
        favorite: Color::rgb(0xff, 0x79, 0xc6),  // Pink
        price: Color::rgb(0xf1, 0xfa, 0x8c),     // Yellow
        error: Color::rgb(0xff, 0x55, 0x55),     // Red
        success: Color::rgb(0x50, 0xfa, 0x7b),   // Green
    }
}
