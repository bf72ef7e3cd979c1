//! Monokai theme
//! https://monokai.pro/

use vitrine_core::Color;

use crate::theme::Theme;

/// Monokai default theme
pub fn default() -> Theme {
    Theme {
        bg: Color::rgb(0x27, 0x28, 0x22),          // background
        surface: Color::rgb(0x3e, 0x3d, 0x32),     // selection
        surface_alt: Color::rgb(0x49, 0x48, 0x3e), // line
        border: Color::rgb(0x75, 0x71, 0x5e),      // comment
        fg: Color::rgb(0xf8, 0xf8, 0xf2),
        muted: Color::rgb(0x90, 0x8c, 0x77),
        accent: Color::rgb(0xae, 0x81, 0xff), // purple
        on_accent: Color::rgb(0x27, 0x28, 0x22),
        favorite: Color::rgb(0xf9, 0x26, 0x72), // magenta
        price: Color::rgb(0xe6, 0xdb, 0x74),    // yellow
        error: Color::rgb(0xf9, 0x26, 0x72),
        success: Color::rgb(0xa6, 0xe2, 0x2e),
    }
}
