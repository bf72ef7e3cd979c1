//! Boutique theme, the default storefront palette

use vitrine_core::Color;

use crate::theme::Theme;

/// Warm paper with a terracotta accent
pub fn default() -> Theme {
    Theme {
        bg: Color::rgb(0x1f, 0x1b, 0x18),
        surface: Color::rgb(0x2b, 0x25, 0x21),
        surface_alt: Color::rgb(0x3a, 0x32, 0x2c),
        border: Color::rgb(0x5a, 0x4e, 0x44),
        fg: Color::rgb(0xf2, 0xe8, 0xdc),
        muted: Color::rgb(0xa8, 0x9a, 0x8b),
        accent: Color::rgb(0xe0, 0x7a, 0x5f),
        on_accent: Color::rgb(0x1f, 0x1b, 0x18),
        favorite: Color::rgb(0xe8, 0x5d, 0x75),
        price: Color::rgb(0xe9, 0xc4, 0x6a),
        error: Color::rgb(0xe5, 0x53, 0x4b),
        success: Color::rgb(0x8f, 0xb9, 0x6b),
    }
}
