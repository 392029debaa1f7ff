//! # Accent Colors
//!
//! The accent color is the single source of truth for the cover's ink: dots,
//! text fills and glows all derive from it. It travels through option records
//! as a hex string (`#1DB954`) and is parsed once at the boundary.
//!
//! Also hosts the curated preset palette offered by the color picker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CovertoneError;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as floats in [0, 1].
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Hex form, upper case with leading `#`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        // Spotify green, the editor's initial accent
        Color::rgb(0x1D, 0xB9, 0x54)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = CovertoneError;

    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CovertoneError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let nibble = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = CovertoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// A named entry of the preset palette.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub label: &'static str,
    pub color: Color,
}

/// Curated accent presets, in picker order.
pub const PRESETS: &[Preset] = &[
    Preset { name: "spotify-green", label: "Spotify Green", color: Color::rgb(0x1D, 0xB9, 0x54) },
    Preset { name: "vibrant-red", label: "Vibrant Red", color: Color::rgb(0xFF, 0x6B, 0x6B) },
    Preset { name: "teal", label: "Teal", color: Color::rgb(0x4E, 0xCD, 0xC4) },
    Preset { name: "bright-yellow", label: "Bright Yellow", color: Color::rgb(0xFF, 0xE6, 0x6D) },
    Preset { name: "neon-pink", label: "Neon Pink", color: Color::rgb(0xFF, 0x00, 0x55) },
    Preset { name: "electric-blue", label: "Electric Blue", color: Color::rgb(0x00, 0x55, 0xFF) },
    Preset { name: "violet", label: "Violet", color: Color::rgb(0x7F, 0x00, 0xFF) },
    Preset { name: "orange", label: "Orange", color: Color::rgb(0xFF, 0x9F, 0x1C) },
    Preset { name: "white-ish", label: "White-ish", color: Color::rgb(0xF7, 0xF7, 0xF7) },
    Preset { name: "black-ish", label: "Black-ish", color: Color::rgb(0x11, 0x11, 0x11) },
];

/// Look up a preset by name (case-insensitive).
pub fn preset_by_name(name: &str) -> Option<Color> {
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.color)
}

/// Parse either a preset name or a hex string.
pub fn parse_color_or_preset(value: &str) -> Result<Color, CovertoneError> {
    preset_by_name(value).map_or_else(|| value.parse(), Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!("#1DB954".parse::<Color>().unwrap(), Color::rgb(0x1D, 0xB9, 0x54));
        assert_eq!("1db954".parse::<Color>().unwrap(), Color::rgb(0x1D, 0xB9, 0x54));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#0a0".parse::<Color>().unwrap(), Color::rgb(0, 0xAA, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_is_upper_hex() {
        assert_eq!(Color::rgb(0xab, 0x01, 0xff).to_string(), "#AB01FF");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(255, 0, 85)).unwrap();
        assert_eq!(json, "\"#FF0055\"");
        let back: Color = serde_json::from_str("\"#ff0055\"").unwrap();
        assert_eq!(back, Color::rgb(255, 0, 85));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(PRESETS.len(), 10);
        assert_eq!(preset_by_name("Teal"), Some(Color::rgb(0x4E, 0xCD, 0xC4)));
        assert_eq!(preset_by_name("mauve"), None);
        assert_eq!(parse_color_or_preset("violet").unwrap(), Color::rgb(0x7F, 0, 0xFF));
        assert_eq!(parse_color_or_preset("#000").unwrap(), Color::BLACK);
    }
}
