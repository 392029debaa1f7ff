//! Glyph coverage masks and the operations effect passes build on.
//!
//! A [`Mask`] is a float coverage buffer (0 = empty, 1 = fully covered) laid
//! over a [`Frame`], a rectangle in canvas pixels. All masks of one title
//! share the same frame, so passes combine them pixel for pixel.
//!
//! - [`Mask::stroke`]: band of a given width centered on the glyph outline
//! - [`Mask::blur`]: gaussian blur (canvas `shadowBlur = 2 * sigma`)
//! - [`Mask::translated`]: sub-pixel shift

use image::{GrayImage, Luma};
use imageproc::distance_transform::euclidean_squared_distance_transform;
use imageproc::filter::gaussian_blur_f32;
use rayon::prelude::*;

use crate::shader::{edge_coverage, lerp};

/// Blurs below this sigma are skipped (visually a no-op).
const MIN_BLUR_SIGMA: f32 = 0.25;

/// A rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x0: i32,
    pub y0: i32,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Coverage buffer over a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    frame: Frame,
    data: Vec<f32>,
}

impl Mask {
    pub fn empty(frame: Frame) -> Self {
        Self {
            frame,
            data: vec![0.0; frame.len()],
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Coverage at frame-local `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.frame.width as usize + x as usize]
    }

    /// Coverage at frame-local coordinates; zero outside the frame.
    #[inline]
    fn get_or_zero(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= self.frame.width as i64 || y >= self.frame.height as i64 {
            0.0
        } else {
            self.get(x as u32, y as u32)
        }
    }

    /// Accumulate coverage at a canvas position (clamped to 1). Positions
    /// outside the frame are ignored.
    pub fn add(&mut self, canvas_x: i32, canvas_y: i32, coverage: f32) {
        let x = canvas_x as i64 - self.frame.x0 as i64;
        let y = canvas_y as i64 - self.frame.y0 as i64;
        if x < 0 || y < 0 || x >= self.frame.width as i64 || y >= self.frame.height as i64 {
            return;
        }
        let idx = y as usize * self.frame.width as usize + x as usize;
        self.data[idx] = (self.data[idx] + coverage).min(1.0);
    }

    pub fn total(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Shift by a sub-pixel offset (bilinear).
    pub fn translated(&self, dx: f32, dy: f32) -> Mask {
        if dx == 0.0 && dy == 0.0 {
            return self.clone();
        }
        let w = self.frame.width as usize;
        let (ix, fx) = (dx.floor() as i64, dx - dx.floor());
        let (iy, fy) = (dy.floor() as i64, dy - dy.floor());

        let mut data = vec![0.0f32; self.frame.len()];
        if w > 0 {
            data.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
                let sy = y as i64 - iy;
                for (x, out) in row.iter_mut().enumerate() {
                    let sx = x as i64 - ix;
                    // Source point is (x - dx, y - dy)
                    let top = lerp(self.get_or_zero(sx, sy), self.get_or_zero(sx - 1, sy), fx);
                    let bottom = lerp(self.get_or_zero(sx, sy - 1), self.get_or_zero(sx - 1, sy - 1), fx);
                    *out = lerp(top, bottom, fy);
                }
            });
        }
        Mask {
            frame: self.frame,
            data,
        }
    }

    /// Band of `width` pixels centered on the outline (canvas `strokeText`
    /// with round joins).
    pub fn stroke(&self, width: f32) -> Mask {
        let half = width / 2.0;
        if half <= 0.0 || self.frame.is_empty() {
            return Mask::empty(self.frame);
        }

        let (w, h) = (self.frame.width, self.frame.height);
        let inside = GrayImage::from_fn(w, h, |x, y| Luma([if self.get(x, y) >= 0.5 { 255 } else { 0 }]));
        let outside = GrayImage::from_fn(w, h, |x, y| Luma([if self.get(x, y) >= 0.5 { 0 } else { 255 }]));
        // Squared distance to the nearest inside / outside pixel
        let to_inside = euclidean_squared_distance_transform(&inside);
        let to_outside = euclidean_squared_distance_transform(&outside);

        let mut data = vec![0.0f32; self.frame.len()];
        data.par_chunks_mut(w as usize).enumerate().for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let (x, y) = (x as u32, y as u32);
                let signed = if inside.get_pixel(x, y).0[0] > 0 {
                    to_outside.get_pixel(x, y).0[0].sqrt() as f32 - 0.5
                } else {
                    to_inside.get_pixel(x, y).0[0].sqrt() as f32 - 0.5
                };
                *out = edge_coverage(half, signed);
            }
        });
        Mask {
            frame: self.frame,
            data,
        }
    }

    /// Gaussian blur with standard deviation `sigma` pixels.
    pub fn blur(&self, sigma: f32) -> Mask {
        if !(sigma >= MIN_BLUR_SIGMA) || self.frame.is_empty() {
            return self.clone();
        }
        let (w, h) = (self.frame.width, self.frame.height);
        let gray = GrayImage::from_fn(w, h, |x, y| Luma([(self.get(x, y) * 255.0).round() as u8]));
        let blurred = gaussian_blur_f32(&gray, sigma);
        Mask {
            frame: self.frame,
            data: blurred.pixels().map(|p| p.0[0] as f32 / 255.0).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: u32, h: u32) -> Frame {
        Frame {
            x0: 0,
            y0: 0,
            width: w,
            height: h,
        }
    }

    /// Filled square from (x0, y0) inclusive to (x1, y1) exclusive.
    fn square(f: Frame, x0: i32, y0: i32, x1: i32, y1: i32) -> Mask {
        let mut m = Mask::empty(f);
        for y in y0..y1 {
            for x in x0..x1 {
                m.add(x, y, 1.0);
            }
        }
        m
    }

    #[test]
    fn test_add_clamps_and_ignores_outside() {
        let mut m = Mask::empty(Frame {
            x0: 10,
            y0: 10,
            width: 4,
            height: 4,
        });
        m.add(11, 12, 0.7);
        m.add(11, 12, 0.7);
        m.add(0, 0, 1.0);
        m.add(14, 10, 1.0);
        assert_eq!(m.get(1, 2), 1.0);
        assert_eq!(m.total(), 1.0);
    }

    #[test]
    fn test_translate_integer() {
        let m = square(frame(10, 10), 2, 2, 4, 4);
        let t = m.translated(3.0, 1.0);
        assert_eq!(t.get(5, 3), 1.0);
        assert_eq!(t.get(2, 2), 0.0);
        assert!((t.total() - m.total()).abs() < 1e-5);
    }

    #[test]
    fn test_translate_fractional_spreads() {
        let m = square(frame(10, 10), 4, 4, 5, 5);
        let t = m.translated(0.5, 0.0);
        assert!((t.get(4, 4) - 0.5).abs() < 1e-6);
        assert!((t.get(5, 4) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_stroke_is_band_around_outline() {
        let m = square(frame(40, 40), 10, 10, 30, 30);
        let s = m.stroke(4.0);
        // Deep interior and far exterior are not stroked
        assert_eq!(s.get(20, 20), 0.0);
        assert_eq!(s.get(2, 2), 0.0);
        // Both sides of the edge are
        assert_eq!(s.get(10, 20), 1.0);
        assert_eq!(s.get(9, 20), 1.0);
        assert!(s.get(8, 20) > 0.0);
    }

    #[test]
    fn test_stroke_of_empty_mask_is_empty() {
        let m = Mask::empty(frame(16, 16));
        assert_eq!(m.stroke(6.0).total(), 0.0);
        assert_eq!(square(frame(8, 8), 2, 2, 6, 6).stroke(0.0).total(), 0.0);
    }

    #[test]
    fn test_blur_spreads_and_roughly_conserves() {
        let m = square(frame(60, 60), 25, 25, 35, 35);
        let b = m.blur(3.0);
        assert!(b.get(30, 30) < 1.0);
        assert!(b.get(22, 30) > 0.0);
        let ratio = b.total() / m.total();
        assert!((0.95..1.05).contains(&ratio), "ratio {}", ratio);
    }

    #[test]
    fn test_tiny_blur_is_noop() {
        let m = square(frame(8, 8), 2, 2, 6, 6);
        assert_eq!(m.blur(0.0), m);
        assert_eq!(m.blur(f32::NAN), m);
    }
}
