//! Intensity adjustment functions.

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Rec. 601 luma of an 8-bit RGB sample, normalized to [0, 1].
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Adjust contrast around a center point.
///
/// Unclamped: callers clamp once at the end of their adjustment chain.
///
/// # Parameters
/// - `value`: Input value
/// - `center`: The midpoint that stays fixed (typically 0.5)
/// - `amount`: Contrast multiplier (>1 increases, <1 decreases)
#[inline]
pub fn contrast(value: f32, center: f32, amount: f32) -> f32 {
    (value - center) * amount + center
}

/// Levels remap: stretch `[black, white]` onto `[0, 1]`.
///
/// A degenerate range (`white <= black`) leaves the value untouched instead
/// of dividing by zero or flipping the ramp. Unclamped.
#[inline]
pub fn levels(value: f32, black: f32, white: f32) -> f32 {
    if white > black {
        (value - black) / (white - black)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.5), 0.5);
        assert_eq!(clamp01(1.5), 1.0);
    }

    #[test]
    fn test_luma() {
        assert_eq!(luma(0, 0, 0), 0.0);
        assert!((luma(255, 255, 255) - 1.0).abs() < 1e-6);
        assert!((luma(255, 0, 0) - 0.299).abs() < 1e-6);
    }

    #[test]
    fn test_contrast() {
        // At center, contrast has no effect
        assert!((contrast(0.5, 0.5, 2.0) - 0.5).abs() < 1e-6);
        // Above center, increased contrast pushes higher
        assert!((contrast(0.75, 0.5, 2.0) - 1.0).abs() < 1e-6);
        // Unclamped
        assert!(contrast(0.9, 0.5, 2.0) > 1.0);
    }

    #[test]
    fn test_levels() {
        assert!((levels(0.5, 0.25, 0.75) - 0.5).abs() < 1e-6);
        assert!((levels(0.25, 0.25, 0.75)).abs() < 1e-6);
        // Degenerate ranges are a no-op
        assert_eq!(levels(0.3, 0.6, 0.6), 0.3);
        assert_eq!(levels(0.3, 0.8, 0.2), 0.3);
    }
}
