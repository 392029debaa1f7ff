//! Title size fitting.
//!
//! Titles start at `180 * text_size` pixels and shrink by 5% per step until
//! they fit within 90% of the canvas width. The loop is capped at 50 steps;
//! a title that still overflows is drawn at the smallest size reached.

use super::font::Face;
use crate::options::FontFamily;

/// Em size at `text_size = 1`.
pub const BASE_FONT_SIZE: f32 = 180.0;
/// Share of the canvas width a title may occupy.
pub const FIT_WIDTH_FRACTION: f32 = 0.9;
pub const MAX_FIT_ITERATIONS: u32 = 50;
pub const SHRINK_FACTOR: f32 = 0.95;

/// Result of fitting a title.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub family: FontFamily,
    /// Final em size in pixels.
    pub size: f32,
    /// Measured advance width at `size`.
    pub width: f32,
    /// Shrink steps taken.
    pub iterations: u32,
}

impl FittedText {
    /// CSS font shorthand of the fitted title.
    pub fn font_string(&self) -> String {
        format!("900 {}px \"{}\", \"Inter\", sans-serif", self.size, self.family)
    }
}

/// Shrink `base` until `measure(size) <= max_width` or the budget runs out.
///
/// Returns `(size, width, iterations)`.
pub fn shrink_to_fit<M>(base: f32, max_width: f32, measure: M) -> (f32, f32, u32)
where
    M: Fn(f32) -> f32,
{
    let mut size = base;
    let mut width = measure(size);
    let mut iterations = 0;
    while width > max_width && iterations < MAX_FIT_ITERATIONS {
        size *= SHRINK_FACTOR;
        width = measure(size);
        iterations += 1;
    }
    (size, width, iterations)
}

/// Fit `title` for a canvas `surface_width` pixels wide.
pub fn fit(face: &Face, title: &str, family: FontFamily, text_size: f32, surface_width: u32) -> FittedText {
    let max_width = FIT_WIDTH_FRACTION * surface_width as f32;
    let (size, width, iterations) =
        shrink_to_fit(BASE_FONT_SIZE * text_size, max_width, |px| face.measure(title, px));

    if width > max_width {
        tracing::debug!(title, size, width, max_width, "fit budget exhausted, title overflows");
    }

    FittedText {
        family,
        size,
        width,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_keeps_base_size() {
        let fitted = fit(&Face::Bitmap, "Hi", FontFamily::Inter, 1.0, 1080);
        assert_eq!(fitted.iterations, 0);
        assert_eq!(fitted.size, 180.0);
        assert_eq!(fitted.width, 180.0);
    }

    #[test]
    fn test_text_size_scales_base() {
        let fitted = fit(&Face::Bitmap, "Hi", FontFamily::Inter, 1.5, 1080);
        assert_eq!(fitted.iterations, 0);
        assert_eq!(fitted.size, 270.0);
    }

    #[test]
    fn test_long_title_shrinks_until_it_fits() {
        // 12 chars at 180px = 1080px wide on the bitmap face
        let fitted = fit(&Face::Bitmap, "Summer Vibes", FontFamily::Heavitas, 1.0, 1080);
        assert!(fitted.iterations > 0);
        assert!(fitted.width <= 0.9 * 1080.0);
        // One step fewer would still overflow
        let previous = fitted.size / SHRINK_FACTOR;
        assert!(Face::Bitmap.measure("Summer Vibes", previous) > 0.9 * 1080.0);
    }

    #[test]
    fn test_budget_bounds_iterations() {
        let (size, width, iterations) = shrink_to_fit(180.0, 10.0, |_| 1000.0);
        assert_eq!(iterations, MAX_FIT_ITERATIONS);
        assert_eq!(width, 1000.0);
        assert!((size - 180.0 * SHRINK_FACTOR.powi(50)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_title_fits_immediately() {
        let fitted = fit(&Face::Bitmap, "", FontFamily::Bogart, 1.0, 1080);
        assert_eq!(fitted.iterations, 0);
    }

    #[test]
    fn test_font_string() {
        let fitted = FittedText {
            family: FontFamily::Cocogoose,
            size: 171.0,
            width: 900.0,
            iterations: 1,
        };
        assert_eq!(fitted.font_string(), "900 171px \"Cocogoose\", \"Inter\", sans-serif");
    }

    #[test]
    fn test_outline_title_shrinks_until_it_fits() {
        let mut book = crate::text::FontBook::builtin();
        book.insert("Inter", include_bytes!("fonts/DejaVuSans-Bold.ttf").to_vec())
            .unwrap();
        let face = book.resolve(FontFamily::Inter);

        let title = "Sunday Morning Coffee";
        let fitted = fit(&face, title, FontFamily::Inter, 1.0, 1080);
        assert!(fitted.iterations > 0 && fitted.iterations < MAX_FIT_ITERATIONS);
        assert!(fitted.width <= 0.9 * 1080.0);
        assert!((fitted.size - 180.0 * SHRINK_FACTOR.powi(fitted.iterations as i32)).abs() < 1e-2);
        assert!(face.measure(title, fitted.size / SHRINK_FACTOR) > 0.9 * 1080.0);
    }
}
