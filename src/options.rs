//! # Render Options
//!
//! The numeric options record supplied by the editor for every render. All
//! fields have defaults, so an options file only needs the keys it changes:
//!
//! ```
//! use covertone::options::{RenderOptions, TextEffect};
//!
//! let opts: RenderOptions =
//!     serde_json::from_str(r##"{"title": "My Mix", "color": "#FF0055", "textEffect": "neon"}"##)
//!         .unwrap();
//! assert_eq!(opts.text_effect, TextEffect::Neon);
//! assert_eq!(opts.width, 1080);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::CovertoneError;

/// Default output edge length in pixels.
pub const DEFAULT_SIZE: u32 = 1080;

/// Largest output edge; JPEG cannot encode past it.
pub const MAX_EDGE: u32 = 65_535;

/// Largest output area in pixels (64 MP).
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Configuration for one cover render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Title text, possibly empty (no text layer then).
    pub title: String,
    /// Accent color: ink for dots and text fills.
    pub color: Color,
    /// Contrast around mid-gray. Range [0.5, 2.0].
    pub contrast: f32,
    /// Brightness multiplier. Range [0.5, 2.0].
    pub brightness: f32,
    /// Halftone grid cell size in pixels (floored to 4).
    pub dot_size: f32,
    pub black_point: f32,
    pub white_point: f32,
    pub font: FontFamily,
    /// Multiplier on the 180px base font size. Range [0.5, 2.0].
    pub text_size: f32,
    /// Normalized horizontal anchor (0 = left edge, 1 = right edge).
    pub text_x: f32,
    /// Normalized vertical anchor (0 = top edge, 1 = bottom edge).
    pub text_y: f32,
    /// Halftone grid rotation in degrees.
    pub rotation: i32,
    pub text_effect: TextEffect,
    /// Swap paper and ink roles.
    pub invert: bool,
    /// Upper-case the title. Applied by [`RenderOptions::prepared`], never by
    /// the renderer itself.
    pub all_caps: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            color: Color::default(),
            contrast: 1.0,
            brightness: 1.0,
            dot_size: 8.0,
            black_point: 0.0,
            white_point: 1.0,
            font: FontFamily::default(),
            text_size: 1.0,
            text_x: 0.5,
            text_y: 0.5,
            rotation: 0,
            text_effect: TextEffect::default(),
            invert: false,
            all_caps: false,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

impl RenderOptions {
    /// Parse an options record from JSON.
    pub fn from_json(json: &str) -> Result<Self, CovertoneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the caller-side title transforms (`all_caps`) and return the
    /// record the renderer should see.
    pub fn prepared(mut self) -> Self {
        if self.all_caps {
            self.title = self.title.to_uppercase();
            self.all_caps = false;
        }
        self
    }

    /// Paper (background) and ink (dot) colors, swapped by `invert`.
    pub fn paper_and_ink(&self) -> (Color, Color) {
        if self.invert {
            (self.color, Color::WHITE)
        } else {
            (Color::WHITE, self.color)
        }
    }

    /// Reject empty outputs and outputs too large to allocate or encode.
    pub fn validate_dimensions(&self) -> Result<(), CovertoneError> {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 || w > MAX_EDGE || h > MAX_EDGE || w as u64 * h as u64 > MAX_PIXELS {
            return Err(CovertoneError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// The closed set of title font families offered by the editor.
///
/// Deserializes from any string: unknown names become [`FontFamily::Inter`],
/// the first family of the fallback chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontFamily {
    Bogart,
    Cocogoose,
    #[default]
    Heavitas,
    Redband,
    Inter,
}

impl FontFamily {
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Bogart,
        FontFamily::Cocogoose,
        FontFamily::Heavitas,
        FontFamily::Redband,
        FontFamily::Inter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Bogart => "Bogart",
            FontFamily::Cocogoose => "Cocogoose",
            FontFamily::Heavitas => "Heavitas",
            FontFamily::Redband => "Redband",
            FontFamily::Inter => "Inter",
        }
    }

    /// Resolve a family name leniently; unknown names fall back to Inter.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(requested = %name, "unknown font family, using Inter");
            FontFamily::Inter
        })
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFamily {
    type Err = CovertoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontFamily::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CovertoneError::Options(format!("Unknown font family '{}'", s)))
    }
}

/// Named text compositing recipes.
///
/// Deserializes from any string: ids without a recipe map to [`TextEffect::Classic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextEffect {
    #[default]
    Classic,
    Metallic,
    Neon,
    Shadow,
    Retro3d,
    Glitch,
    Echo,
    Glass,
    Glow,
    Gradient,
    Outline,
}

impl TextEffect {
    /// All effects in editor order.
    pub const ALL: [TextEffect; 11] = [
        TextEffect::Classic,
        TextEffect::Metallic,
        TextEffect::Neon,
        TextEffect::Shadow,
        TextEffect::Retro3d,
        TextEffect::Glitch,
        TextEffect::Echo,
        TextEffect::Glass,
        TextEffect::Glow,
        TextEffect::Gradient,
        TextEffect::Outline,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TextEffect::Classic => "classic",
            TextEffect::Metallic => "metallic",
            TextEffect::Neon => "neon",
            TextEffect::Shadow => "shadow",
            TextEffect::Retro3d => "retro3d",
            TextEffect::Glitch => "glitch",
            TextEffect::Echo => "echo",
            TextEffect::Glass => "glass",
            TextEffect::Glow => "glow",
            TextEffect::Gradient => "gradient",
            TextEffect::Outline => "outline",
        }
    }

    /// Short label shown in the effect picker.
    pub fn label(self) -> &'static str {
        match self {
            TextEffect::Retro3d => "3D",
            TextEffect::Gradient => "Grad",
            TextEffect::Classic => "Classic",
            TextEffect::Metallic => "Metallic",
            TextEffect::Neon => "Neon",
            TextEffect::Shadow => "Shadow",
            TextEffect::Glitch => "Glitch",
            TextEffect::Echo => "Echo",
            TextEffect::Glass => "Glass",
            TextEffect::Glow => "Glow",
            TextEffect::Outline => "Outline",
        }
    }

    /// Resolve an effect id; unrecognized ids fall back to classic.
    pub fn from_id(id: &str) -> Self {
        TextEffect::ALL
            .into_iter()
            .find(|e| e.id().eq_ignore_ascii_case(id.trim()))
            .unwrap_or_default()
    }
}

impl fmt::Display for TextEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl From<String> for FontFamily {
    fn from(name: String) -> Self {
        FontFamily::from_name(&name)
    }
}

impl From<FontFamily> for String {
    fn from(family: FontFamily) -> Self {
        family.name().to_string()
    }
}

impl From<String> for TextEffect {
    fn from(id: String) -> Self {
        TextEffect::from_id(&id)
    }
}

impl From<TextEffect> for String {
    fn from(effect: TextEffect) -> Self {
        effect.id().to_string()
    }
}
