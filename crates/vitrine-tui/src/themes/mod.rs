//! Theme registry and loader
//!
//! Provides a handful of built-in palettes with hex overrides from the config
//! file. Tokens are only endpoints; components interpolate between them.

mod boutique;
mod dracula;
mod monokai;
mod nord;
mod one_dark;

use tracing::warn;
use vitrine_core::config::{ThemeColorOverrides, ThemeConfig};
use vitrine_core::Color;

use crate::theme::Theme;

/// Theme used when the configured name is unknown
pub fn default_theme() -> Theme {
    boutique::default()
}

/// Load a theme by name from config
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "boutique" => boutique::default(),
        "dracula" => dracula::default(),
        "nord" => nord::default(),
        "one-dark" | "onedark" => one_dark::default(),
        "monokai" => monokai::default(),
        other => {
            warn!(theme = other, "Unknown theme, falling back to boutique");
            default_theme()
        }
    };

    apply_overrides(base, &config.colors)
}

/// Apply user color overrides to a base theme
fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    let set = |slot: &mut Color, hex: &Option<String>| {
        let Some(hex) = hex else {
            return;
        };
        match Color::from_hex(hex) {
            Ok(color) => *slot = color,
            Err(e) => warn!("Ignoring theme override: {}", e),
        }
    };

    set(&mut theme.bg, &overrides.bg);
    set(&mut theme.surface, &overrides.surface);
    set(&mut theme.surface_alt, &overrides.surface_alt);
    set(&mut theme.fg, &overrides.fg);
    set(&mut theme.muted, &overrides.muted);
    set(&mut theme.accent, &overrides.accent);
    set(&mut theme.on_accent, &overrides.on_accent);
    set(&mut theme.border, &overrides.border);
    set(&mut theme.favorite, &overrides.favorite);
    set(&mut theme.price, &overrides.price);
    set(&mut theme.error, &overrides.error);
    set(&mut theme.success, &overrides.success);

    theme
}

/// Get list of available theme names
pub fn available_themes() -> Vec<&'static str> {
    vec!["boutique", "dracula", "monokai", "nord", "one-dark"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_theme_default() {
        let theme = load_theme(&ThemeConfig::default());
        assert_eq!(theme, boutique::default());
    }

    #[test]
    fn test_load_theme_by_name() {
        let config = ThemeConfig {
            name: "Nord".to_string(),
            colors: ThemeColorOverrides::default(),
        };
        assert_eq!(load_theme(&config).bg, Color::rgb(0x2e, 0x34, 0x40));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = ThemeConfig {
            name: "solarized-sunrise".to_string(),
            colors: ThemeColorOverrides::default(),
        };
        assert_eq!(load_theme(&config), default_theme());
    }

    #[test]
    fn test_load_theme_with_override() {
        let config = ThemeConfig {
            name: "dracula".to_string(),
            colors: ThemeColorOverrides {
                accent: Some("#ff0000".to_string()),
                price: Some("0f0".to_string()),
                ..Default::default()
            },
        };
        let theme = load_theme(&config);
        assert_eq!(theme.accent, Color::rgb(255, 0, 0));
        assert_eq!(theme.price, Color::rgb(0, 255, 0));
    }

    #[test]
    fn test_invalid_override_keeps_base() {
        let config = ThemeConfig {
            name: "monokai".to_string(),
            colors: ThemeColorOverrides {
                bg: Some("#gg0000".to_string()),
                ..Default::default()
            },
        };
        assert_eq!(load_theme(&config).bg, monokai::default().bg);
    }

    #[test]
    fn test_every_listed_theme_loads() {
        for name in available_themes() {
            let config = ThemeConfig {
                name: name.to_string(),
                colors: ThemeColorOverrides::default(),
            };
            let theme = load_theme(&config);
            if name != "boutique" {
                assert_ne!(theme, default_theme(), "{} fell back", name);
            }
        }
    }
}
