use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::motion::timing::tick_duration;
use crate::motion::{
    EasingCurve, IndicatorConfig, ParallaxConfig, PressConfig, SpringConfig, TimingConfig,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Motion tuning: spring presets, entry timing, parallax and indicator layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Frame rate while anything is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Delay between consecutive list entries
    #[serde(default = "default_stagger_delay")]
    pub stagger_delay_ms: u64,
    /// Duration of each card's entry fade
    #[serde(default = "default_entry_duration")]
    pub entry_duration_ms: u64,
    #[serde(default)]
    pub entry_easing: EasingCurve,
    /// Fast spring used on press-down
    #[serde(default = "default_press_spring")]
    pub press: SpringConfig,
    /// Gentler spring used on release
    #[serde(default = "default_release_spring")]
    pub release: SpringConfig,
    /// Spring for selection changes (indicator, chip scale, tabs)
    #[serde(default = "default_selection_spring")]
    pub selection: SpringConfig,
    /// Resting scale of a selected element
    #[serde(default = "default_selected_scale")]
    pub selected_scale: f64,
    /// Resting scale of an unselected element
    #[serde(default = "default_resting_scale")]
    pub resting_scale: f64,
    /// Scale while pressed
    #[serde(default = "default_pressed_scale")]
    pub pressed_scale: f64,
    /// How long a key activation holds the press
    #[serde(default = "default_tap_hold")]
    pub tap_hold_ms: u64,
    #[serde(default)]
    pub parallax: ParallaxConfig,
    #[serde(default)]
    pub indicator: IndicatorConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            animation_fps: default_animation_fps(),
            stagger_delay_ms: default_stagger_delay(),
            entry_duration_ms: default_entry_duration(),
            entry_easing: EasingCurve::default(),
            press: default_press_spring(),
            release: default_release_spring(),
            selection: default_selection_spring(),
            selected_scale: default_selected_scale(),
            resting_scale: default_resting_scale(),
            pressed_scale: default_pressed_scale(),
            tap_hold_ms: default_tap_hold(),
            parallax: ParallaxConfig::default(),
            indicator: IndicatorConfig::default(),
        }
    }
}

impl MotionConfig {
    /// Check every preset with the same rules drivers use at construction
    pub fn validate(&self) -> crate::Result<()> {
        self.press.validate()?;
        self.release.validate()?;
        self.selection.validate()?;
        self.entry_timing().validate()?;
        self.parallax.validate()?;
        self.indicator.validate()?;
        for (name, scale) in [
            ("selected_scale", self.selected_scale),
            ("resting_scale", self.resting_scale),
            ("pressed_scale", self.pressed_scale),
        ] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(crate::Error::Config(format!(
                    "{} must be positive, got {}",
                    name, scale
                )));
            }
        }
        Ok(())
    }

    pub fn press_config(&self) -> PressConfig {
        PressConfig {
            pressed_value: self.pressed_scale,
            press_spring: self.press,
            release_spring: self.release,
            tap_hold_ms: self.tap_hold_ms,
        }
    }

    pub fn entry_timing(&self) -> TimingConfig {
        TimingConfig::new(self.entry_duration_ms, self.entry_easing)
    }

    pub fn stagger_delay(&self) -> Duration {
        Duration::from_millis(self.stagger_delay_ms)
    }

    /// Frame interval while animating
    pub fn frame_interval(&self) -> Duration {
        tick_duration(self.animation_fps)
    }

    /// Resting scale for the given selection state
    pub fn resting_for(&self, selected: bool) -> f64 {
        if selected {
            self.selected_scale
        } else {
            self.resting_scale
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Simulated catalog latency
    #[serde(default = "default_catalog_latency")]
    pub catalog_latency_ms: u64,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            catalog_latency_ms: default_catalog_latency(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Active theme plus per-color overrides.
///
/// Accepts either `theme = "nord"` or a `[ui.theme]` table with `name` and
/// `colors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ThemeSetting")]
pub struct ThemeConfig {
    /// Theme name (e.g., "boutique", "nord")
    pub name: String,
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThemeSetting {
    Named(String),
    Table {
        #[serde(default = "default_theme_name")]
        name: String,
        #[serde(default)]
        colors: ThemeColorOverrides,
    },
}

impl From<ThemeSetting> for ThemeConfig {
    fn from(setting: ThemeSetting) -> Self {
        match setting {
            ThemeSetting::Named(name) => Self {
                name,
                colors: ThemeColorOverrides::default(),
            },
            ThemeSetting::Table { name, colors } => Self { name, colors },
        }
    }
}

fn default_theme_name() -> String {
    "boutique".to_string()
}

/// Optional color overrides for theme customization
/// Each color is a hex string (e.g., "#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Screen background
    pub bg: Option<String>,
    /// Card and chip surface
    pub surface: Option<String>,
    /// Raised surface (pressed, hovered)
    pub surface_alt: Option<String>,
    /// Primary foreground
    pub fg: Option<String>,
    /// Dimmed foreground
    pub muted: Option<String>,
    /// Accent (indicator pill, selected chip)
    pub accent: Option<String>,
    /// Text drawn on the accent
    pub on_accent: Option<String>,
    /// Border of unselected elements
    pub border: Option<String>,
    /// Favorite tint
    pub favorite: Option<String>,
    /// Price tag
    pub price: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// `[keymap]`: one Vim-notation key per storefront action.
///
/// Missing entries fall back to the defaults below; `gg` is the only
/// two-key sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapConfig {
    /// Quit the application
    pub quit: String,

    // Card list
    /// Move cursor down
    pub move_down: String,
    /// Move cursor up
    pub move_up: String,
    /// Scroll half page down
    pub scroll_half_down: String,
    /// Scroll half page up
    pub scroll_half_up: String,
    /// Jump to first card
    pub jump_to_top: String,
    /// Jump to last card
    pub jump_to_bottom: String,

    // Filter chips
    /// Select next filter
    pub next_filter: String,
    /// Select previous filter
    pub prev_filter: String,
    /// Clear the filter selection
    pub clear_filter: String,

    // Bottom navigation
    /// Next tab
    pub next_tab: String,
    /// Previous tab
    pub prev_tab: String,

    // Actions
    /// Press the focused card
    pub press: String,
    /// Toggle favorite on the focused card
    pub toggle_favorite: String,
    /// Add the focused card to the cart
    pub add_to_cart: String,
    /// Reload the catalog and replay the entry animation
    pub reload: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        let key = |k: &str| k.to_string();
        Self {
            quit: key("q"),
            move_down: key("j"),
            move_up: key("k"),
            scroll_half_down: key("<C-d>"),
            scroll_half_up: key("<C-u>"),
            jump_to_top: key("gg"),
            jump_to_bottom: key("G"),
            next_filter: key("l"),
            prev_filter: key("h"),
            clear_filter: key("x"),
            next_tab: key("<Tab>"),
            prev_tab: key("<S-Tab>"),
            press: key("<CR>"),
            toggle_favorite: key("f"),
            add_to_cart: key("a"),
            reload: key("r"),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vitrine")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_animation_fps() -> u32 {
    60
}

fn default_stagger_delay() -> u64 {
    100
}

fn default_entry_duration() -> u64 {
    350
}

pub(crate) fn default_press_spring() -> SpringConfig {
    SpringConfig::new(900.0, 60.0).with_precision(0.001)
}

pub(crate) fn default_release_spring() -> SpringConfig {
    SpringConfig::new(220.0, 14.0).with_precision(0.001)
}

fn default_selection_spring() -> SpringConfig {
    SpringConfig::default()
}

fn default_selected_scale() -> f64 {
    1.05
}

fn default_resting_scale() -> f64 {
    1.0
}

pub(crate) fn default_pressed_scale() -> f64 {
    0.95
}

pub(crate) fn default_tap_hold() -> u64 {
    120
}

fn default_tick_rate() -> u64 {
    100
}

fn default_catalog_latency() -> u64 {
    400
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)?
        } else {
            Self::default()
        };
        config.motion.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/vitrine/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("vitrine")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("vitrine.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        config.motion.validate().unwrap();
        assert_eq!(config.motion.stagger_delay_ms, 100);
        assert_eq!(config.motion.indicator.gap, 12.0);
        assert_eq!(config.motion.resting_for(true), 1.05);
        assert_eq!(config.motion.resting_for(false), 1.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::parse(
            r#"
            [motion]
            stagger_delay_ms = 40

            [motion.selection]
            stiffness = 300.0
            damping = 30.0

            [ui]
            theme = "nord"
            "#,
        )
        .unwrap();
        assert_eq!(config.motion.stagger_delay_ms, 40);
        assert_eq!(config.motion.selection.mass, 1.0);
        assert_eq!(config.motion.selection.stiffness, 300.0);
        assert_eq!(config.motion.entry_duration_ms, 350);
        assert_eq!(config.ui.theme.name, "nord");
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_theme_table_with_overrides() {
        let config = AppConfig::parse(
            r##"
            [ui.theme]
            name = "boutique"
            colors = { accent = "#ff8800" }
            "##,
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "boutique");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff8800"));
    }

    #[test]
    fn test_keymap_overrides_only_named_keys() {
        let config = AppConfig::parse(
            r#"
            [keymap]
            add_to_cart = "<C-a>"
            "#,
        )
        .unwrap();
        assert_eq!(config.keymap.add_to_cart, "<C-a>");
        assert_eq!(config.keymap.jump_to_top, "gg");
        assert_eq!(config.ui.theme.name, "boutique");
    }

    #[test]
    fn test_invalid_spring_rejected() {
        let config = AppConfig::parse(
            r#"
            [motion.press]
            stiffness = -5.0
            damping = 10.0
            "#,
        )
        .unwrap();
        assert!(config.motion.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("vitrine-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = AppConfig::default();
        config.motion.entry_easing = EasingCurve::Bezier([0.25, 0.1, 0.25, 1.0]);
        config.motion.parallax.unit = 6.0;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.motion.entry_easing, config.motion.entry_easing);
        assert_eq!(loaded.motion.parallax.unit, 6.0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("vitrine-does-not-exist/config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.motion.animation_fps, 60);
    }
}
