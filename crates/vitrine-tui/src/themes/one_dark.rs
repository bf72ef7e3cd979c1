//! One Dark theme
//! https://github.com/atom/atom/tree/master/packages/one-dark-syntax

use vitrine_core::Color;

use crate::theme::Theme;

/// One Dark default theme
pub fn default() -> Theme {
    Theme {
        bg: Color::rgb(0x28, 0x2c, 0x34),          // bg
        surface: Color::rgb(0x21, 0x25, 0x2b),     // bg-darker
        surface_alt: Color::rgb(0x3e, 0x44, 0x51), // bg-highlight
        border: Color::rgb(0x4b, 0x52, 0x63),      // gutter
        fg: Color::rgb(0xab, 0xb2, 0xbf),
        muted: Color::rgb(0x7f, 0x84, 0x8e),
        accent: Color::rgb(0x61, 0xaf, 0xef), // blue
        on_accent: Color::rgb(0x28, 0x2c, 0x34),
        favorite: Color::rgb(0xe0, 0x6c, 0x75), // red
        price: Color::rgb(0xe5, 0xc0, 0x7b),    // yellow
        error: Color::rgb(0xe0, 0x6c, 0x75),
        success: Color::rgb(0x98, 0xc3, 0x79),
    }
}
