use ratatui::style::Color as TermColor;
use vitrine_core::components::ChipPalette;
use vitrine_core::Color;

/// Runtime theme with configurable colors
///
/// Tokens stay in core [`Color`] so they can be fed into interpolators;
/// [`Theme::term`] converts at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Surfaces
    pub bg: Color,
    pub surface: Color,
    pub surface_alt: Color,
    pub border: Color,

    // Text
    pub fg: Color,
    pub muted: Color,

    // Accents
    pub accent: Color,
    pub on_accent: Color,
    pub favorite: Color,
    pub price: Color,

    // Semantic colors
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::default_theme()
    }
}

impl Theme {
    /// Convert a token into a terminal color
    #[inline]
    pub fn term(color: Color) -> TermColor {
        TermColor::Rgb(color.r, color.g, color.b)
    }

    /// `color` drawn at `opacity` over the screen background
    ///
    /// Terminals have no alpha, so opacity is rendered by blending.
    pub fn faded(&self, color: Color, opacity: f64) -> TermColor {
        Self::term(color.with_alpha(opacity).over(self.bg))
    }

    /// Endpoints for the filter chip background and label fades
    pub fn chip_palette(&self) -> ChipPalette {
        ChipPalette {
            idle_bg: self.surface,
            selected_bg: self.accent,
            idle_fg: self.fg,
            selected_fg: self.on_accent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faded_blends_toward_background() {
        let theme = Theme {
            bg: Color::BLACK,
            ..Theme::default()
        };
        assert_eq!(theme.faded(Color::WHITE, 1.0), TermColor::Rgb(255, 255, 255));
        assert_eq!(theme.faded(Color::WHITE, 0.0), TermColor::Rgb(0, 0, 0));
        assert_eq!(theme.faded(Color::WHITE, 0.5), TermColor::Rgb(128, 128, 128));
    }

    #[test]
    fn test_chip_palette_uses_accent() {
        let theme = Theme::default();
        let palette = theme.chip_palette();
        assert_eq!(palette.selected_bg, theme.accent);
        assert_eq!(palette.idle_bg, theme.surface);
    }
}
