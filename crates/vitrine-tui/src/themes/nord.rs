//! Nord theme
//! https://www.nordtheme.com/

use vitrine_core::Color;

use crate::theme::Theme;

/// Nord default theme
pub fn default() -> Theme {
    Theme {
        // Polar Night
        bg: Color::rgb(0x2e, 0x34, 0x40),          // nord0
        surface: Color::rgb(0x3b, 0x42, 0x52),     // nord1
        surface_alt: Color::rgb(0x43, 0x4c, 0x5e), // nord2
        border: Color::rgb(0x4c, 0x56, 0x6a),      // nord3
        // Snow Storm
        fg: Color::rgb(0xec, 0xef, 0xf4),    // nord6
        muted: Color::rgb(0xd8, 0xde, 0xe9), // nord4
        // Frost
        accent: Color::rgb(0x88, 0xc0, 0xd0),    // nord8
        on_accent: Color::rgb(0x2e, 0x34, 0x40), // nord0
        // Aurora
        favorite: Color::rgb(0xb4, 0x8e, 0xad), // nord15
        price: Color::rgb(0xeb, 0xcb, 0x8b),    // nord13
        error: Color::rgb(0xbf, 0x61, 0x6a),    // nord11
        success: Color::rgb(0xa3, 0xbe, 0x8c),  // nord14
    }
}
