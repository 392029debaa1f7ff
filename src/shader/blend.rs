//! Blending and interpolation functions.

/// Linear interpolation between two values.
///
/// Returns `a` when `t=0`, `b` when `t=1`, and linear blend in between.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Porter-Duff source-over for one channel of a premultiplied pixel.
#[inline]
pub fn over(dst: f32, src: f32, src_alpha: f32) -> f32 {
    src + dst * (1.0 - src_alpha)
}
