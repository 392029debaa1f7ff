//! Distance functions for spatial calculations.

/// Euclidean distance between two points.
#[inline]
pub fn dist(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    (dx * dx + dy * dy).sqrt()
}

/// Anti-aliased coverage of a pixel whose center lies `d` from a shape
/// boundary, where the shape extends `extent` from the boundary origin.
///
/// One-pixel linear ramp: full coverage well inside, zero well outside.
#[inline]
pub fn edge_coverage(extent: f32, d: f32) -> f32 {
    (extent - d + 0.5).clamp(0.0, 1.0)
}
