//! Coordinate transformation functions.

/// Rotate a point around the origin.
///
/// # Parameters
/// - `x`, `y`: Point coordinates
/// - `cos_a`, `sin_a`: Cosine and sine of the rotation angle
///
/// Takes the precomputed trig pair so grid walks evaluate it once.
#[inline]
pub fn rotate(x: f32, y: f32, cos_a: f32, sin_a: f32) -> (f32, f32) {
    (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
}

/// Cosine and sine of an angle given in degrees.
#[inline]
pub fn trig_deg(angle_deg: f32) -> (f32, f32) {
    let rad = angle_deg.to_radians();
    (rad.cos(), rad.sin())
}
