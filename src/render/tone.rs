//! # Tone Mapping
//!
//! Converts an RGB sample into a normalized brightness in [0, 1]:
//!
//! ```text
//! luma       = (0.299 r + 0.587 g + 0.114 b) / 255
//! luma      *= brightness
//! luma       = (luma - 0.5) * contrast + 0.5
//! luma       = (luma - black) / (white - black)     only when white > black
//! brightness = clamp(luma, 0, 1)
//! ```
//!
//! Out-of-range settings are never rejected; the final clamp is the only
//! correction.

use crate::options::RenderOptions;
use crate::shader::{clamp01, contrast, levels, luma};

/// Tone curve parameters resolved from a [`RenderOptions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneMapper {
    pub brightness: f32,
    pub contrast: f32,
    pub black_point: f32,
    pub white_point: f32,
}

impl Default for ToneMapper {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            black_point: 0.0,
            white_point: 1.0,
        }
    }
}

impl ToneMapper {
    pub fn from_options(opts: &RenderOptions) -> Self {
        Self {
            brightness: opts.brightness,
            contrast: opts.contrast,
            black_point: opts.black_point,
            white_point: opts.white_point,
        }
    }

    /// Map an RGB sample to brightness (0 = black, 1 = white).
    #[inline]
    pub fn map(&self, r: u8, g: u8, b: u8) -> f32 {
        let value = luma(r, g, b) * self.brightness;
        let value = contrast(value, 0.5, self.contrast);
        clamp01(levels(value, self.black_point, self.white_point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_is_plain_luma() {
        let tone = ToneMapper::default();
        for &(r, g, b) in &[(0, 0, 0), (255, 255, 255), (128, 128, 128), (29, 185, 84), (255, 0, 0)] {
            let expected = luma(r, g, b);
            assert!(
                (tone.map(r, g, b) - expected).abs() < 1e-6,
                "({}, {}, {}) -> {} expected {}",
                r,
                g,
                b,
                tone.map(r, g, b),
                expected
            );
        }
    }

    #[test]
    fn test_brightness_scales_before_contrast() {
        let tone = ToneMapper {
            brightness: 0.5,
            ..Default::default()
        };
        // white * 0.5 = 0.5
        assert!((tone.map(255, 255, 255) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_pivots_on_mid_gray() {
        let tone = ToneMapper {
            contrast: 2.0,
            ..Default::default()
        };
        // 0.25 -> (0.25 - 0.5) * 2 + 0.5 = 0.0
        let quarter = (0.25f32 * 255.0).round() as u8;
        assert!(tone.map(quarter, quarter, quarter) < 0.01);
        // Clamped at the top
        assert_eq!(tone.map(230, 230, 230), 1.0);
    }

    #[test]
    fn test_levels_stretch() {
        let tone = ToneMapper {
            black_point: 0.2,
            white_point: 0.6,
            ..Default::default()
        };
        // 0.4 sits halfway between 0.2 and 0.6
        let v = (0.4f32 * 255.0).round() as u8;
        assert!((tone.map(v, v, v) - 0.5).abs() < 0.01);
        assert_eq!(tone.map(20, 20, 20), 0.0);
        assert_eq!(tone.map(200, 200, 200), 1.0);
    }

    #[test]
    fn test_degenerate_levels_skip_remap() {
        let degenerate = ToneMapper {
            black_point: 0.7,
            white_point: 0.3,
            ..Default::default()
        };
        let neutral = ToneMapper::default();
        assert_eq!(degenerate.map(100, 150, 200), neutral.map(100, 150, 200));

        let equal = ToneMapper {
            black_point: 0.5,
            white_point: 0.5,
            ..Default::default()
        };
        let v = equal.map(100, 150, 200);
        assert!(v.is_finite());
        assert_eq!(v, neutral.map(100, 150, 200));
    }

    #[test]
    fn test_output_always_in_unit_range() {
        let tone = ToneMapper {
            brightness: 2.0,
            contrast: 2.0,
            black_point: 0.4,
            white_point: 0.5,
        };
        for v in (0..=255u8).step_by(5) {
            let b = tone.map(v, v, v);
            assert!((0.0..=1.0).contains(&b));
        }
    }
}
