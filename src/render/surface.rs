//! # Working Surface
//!
//! The opaque float RGB canvas every render paints into. Channels are linear
//! blends of sRGB values in [0, 1] (the same space a browser canvas blends
//! in), converted to 8 bits once at encode time.

use image::{Rgb, Rgb32FImage, RgbImage};

use crate::color::Color;
use crate::shader::{dist, edge_coverage, lerp};
use crate::text::layer::Layer;

/// Opaque RGB canvas.
#[derive(Debug, Clone)]
pub struct Surface {
    buffer: Rgb32FImage,
}

impl Surface {
    /// New surface filled with `paper`.
    pub fn new(width: u32, height: u32, paper: Color) -> Self {
        Self {
            buffer: Rgb32FImage::from_pixel(width, height, Rgb(paper.to_f32())),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Fill the whole surface with one color.
    pub fn fill(&mut self, color: Color) {
        let c = color.to_f32();
        for px in self.buffer.pixels_mut() {
            px.0 = c;
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Paint an anti-aliased filled circle.
    ///
    /// Pixel centers within `radius` of `(cx, cy)` are fully covered; coverage
    /// ramps linearly to zero over the one-pixel band at the rim.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let ink = color.to_f32();
        let w = self.width() as i64;
        let h = self.height() as i64;

        let x0 = ((cx - radius - 1.0).floor() as i64).max(0);
        let x1 = ((cx + radius + 1.0).ceil() as i64).min(w - 1);
        let y0 = ((cy - radius - 1.0).floor() as i64).max(0);
        let y1 = ((cy + radius + 1.0).ceil() as i64).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = dist(x as f32 + 0.5, y as f32 + 0.5, cx, cy);
                let coverage = edge_coverage(radius, d);
                if coverage <= 0.0 {
                    continue;
                }
                let px = self.buffer.get_pixel_mut(x as u32, y as u32);
                for c in 0..3 {
                    px.0[c] = lerp(px.0[c], ink[c], coverage);
                }
            }
        }
    }

    /// Composite a premultiplied text layer source-over onto the surface.
    ///
    /// Layer pixels outside the surface are clipped.
    pub fn composite(&mut self, layer: &Layer) {
        let (ox, oy) = layer.origin();
        let w = self.width() as i64;
        let h = self.height() as i64;

        for ly in 0..layer.height() {
            let y = oy as i64 + ly as i64;
            if y < 0 || y >= h {
                continue;
            }
            for lx in 0..layer.width() {
                let x = ox as i64 + lx as i64;
                if x < 0 || x >= w {
                    continue;
                }
                let [r, g, b, a] = layer.pixel(lx, ly);
                if a <= 0.0 {
                    continue;
                }
                let px = self.buffer.get_pixel_mut(x as u32, y as u32);
                px.0[0] = r + px.0[0] * (1.0 - a);
                px.0[1] = g + px.0[1] * (1.0 - a);
                px.0[2] = b + px.0[2] * (1.0 - a);
            }
        }
    }

    /// Quantize to 8-bit RGB.
    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b] = self.buffer.get_pixel(x, y).0;
            Rgb([to_u8(r), to_u8(g), to_u8(b)])
        })
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
