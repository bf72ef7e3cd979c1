//! RGBA color used as an interpolation endpoint
//!
//! Theme tokens arrive as hex strings; interpolation happens per channel so
//! midpoints are real colors rather than concatenated opacity suffixes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha scaled from an opacity in [0, 1]
    pub fn with_alpha(self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Channel-wise linear interpolation; `t` outside [0, 1] extrapolates and
    /// each channel saturates at 0 and 255
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let channel = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }

    /// Composite this color over an opaque background, honouring alpha
    pub fn over(self, background: Color) -> Color {
        let t = self.a as f64 / 255.0;
        let opaque = Color { a: 255, ..self };
        Color {
            a: 255,
            ..background.lerp(opaque, t)
        }
    }

    /// Parse "#RGB", "#RRGGBB" or "#RRGGBBAA" (the "#" is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let bad = || Error::InvalidColor(hex.to_string());
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| bad());

        // from_str_radix alone would accept a leading '+'
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }

        match digits.len() {
            // Short form: RGB -> RRGGBB
            3 => Ok(Color::rgb(
                byte(&digits[0..1])? * 17,
                byte(&digits[1..2])? * 17,
                byte(&digits[2..3])? * 17,
            )),
            6 => Ok(Color::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Color::rgba(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex("ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex("#f80").unwrap(), Color::rgb(255, 136, 0));
        assert_eq!(
            Color::from_hex("#ff800080").unwrap(),
            Color::rgba(255, 128, 0, 128)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("#ééé").is_err());
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#+f+f+f").is_err());
        assert!(Color::from_hex("+fff").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(c.to_string(), "#01020304");
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!("#01020304".parse::<Color>().unwrap(), c);
    }

    #[test]
    fn test_channel_wise_midpoint() {
        let a = Color::rgba(0, 100, 200, 255);
        let b = Color::rgba(100, 200, 0, 55);
        assert_eq!(a.lerp(b, 0.5), Color::rgba(50, 150, 100, 155));
    }

    #[test]
    fn test_lerp_saturates() {
        let a = Color::rgb(200, 10, 0);
        let b = Color::rgb(250, 0, 0);
        assert_eq!(a.lerp(b, 3.0), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_with_alpha_and_over() {
        let red = Color::rgb(255, 0, 0).with_alpha(0.5);
        assert_eq!(red.a, 128);
        let blended = red.over(Color::BLACK);
        assert_eq!(blended, Color::rgb(128, 0, 0));
        assert_eq!(Color::WHITE.over(Color::BLACK), Color::WHITE);
    }
}
