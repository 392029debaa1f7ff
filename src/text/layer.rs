//! Premultiplied RGBA text layer.
//!
//! Effect passes paint into a transparent layer covering the title's frame;
//! the finished layer is composited onto the surface in one step. Keeping the
//! text on its own layer gives source-atop its canvas meaning: the sheen of
//! the gradient effect lands only on pixels the text already painted.

use super::mask::{Frame, Mask};
use crate::color::Color;
use crate::shader::{lerp, over};

/// Straight (non-premultiplied) RGBA, channels in [0, 1].
pub type Rgba = [f32; 4];

/// Straight RGBA from a color and an alpha.
pub fn rgba(color: Color, alpha: f32) -> Rgba {
    let [r, g, b] = color.to_f32();
    [r, g, b, alpha]
}

/// Vertical linear gradient in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub y0: f32,
    pub y1: f32,
    /// `(offset in [0, 1], color)`, sorted by offset.
    pub stops: Vec<(f32, Rgba)>,
}

impl LinearGradient {
    pub fn vertical(y0: f32, y1: f32, stops: Vec<(f32, Rgba)>) -> Self {
        Self { y0, y1, stops }
    }

    /// Color at canvas row `y`; padded with the end stops outside `[y0, y1]`.
    pub fn at(&self, y: f32) -> Rgba {
        let Some(&(_, first)) = self.stops.first() else {
            return [0.0; 4];
        };
        let span = self.y1 - self.y0;
        let t = if span == 0.0 { 0.0 } else { (y - self.y0) / span };

        let mut prev = (0.0, first);
        for &(offset, color) in &self.stops {
            if t <= offset {
                let width = offset - prev.0;
                let local = if width <= 0.0 { 1.0 } else { ((t - prev.0) / width).clamp(0.0, 1.0) };
                return [
                    lerp(prev.1[0], color[0], local),
                    lerp(prev.1[1], color[1], local),
                    lerp(prev.1[2], color[2], local),
                    lerp(prev.1[3], color[3], local),
                ];
            }
            prev = (offset, color);
        }
        prev.1
    }
}

/// Fill source for a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Gradient(LinearGradient),
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Paint::Solid(rgba(color, 1.0))
    }

    #[inline]
    fn at(&self, y: f32) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Gradient(g) => g.at(y),
        }
    }
}

/// Compositing operator of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    /// Paint only where the layer already has coverage; layer alpha unchanged.
    SourceAtop,
}

/// Premultiplied RGBA buffer over a frame.
#[derive(Debug, Clone)]
pub struct Layer {
    frame: Frame,
    data: Vec<[f32; 4]>,
}

impl Layer {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            data: vec![[0.0; 4]; frame.len()],
        }
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.frame.x0, self.frame.y0)
    }

    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }

    /// Premultiplied pixel at frame-local coordinates.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.data[y as usize * self.frame.width as usize + x as usize]
    }

    /// Paint `paint` through `mask` with the given operator.
    pub fn fill(&mut self, mask: &Mask, paint: &Paint, op: Composite) {
        debug_assert_eq!(mask.frame(), self.frame);
        let w = self.frame.width as usize;
        if w == 0 {
            return;
        }

        for (y, row) in self.data.chunks_mut(w).enumerate() {
            // Paint is sampled at pixel centers
            let canvas_y = self.frame.y0 as f32 + y as f32 + 0.5;
            let [r, g, b, a] = paint.at(canvas_y);
            for (x, dst) in row.iter_mut().enumerate() {
                let coverage = mask.get(x as u32, y as u32);
                let sa = a * coverage;
                if sa <= 0.0 {
                    continue;
                }
                match op {
                    Composite::SourceOver => {
                        dst[0] = over(dst[0], r * sa, sa);
                        dst[1] = over(dst[1], g * sa, sa);
                        dst[2] = over(dst[2], b * sa, sa);
                        dst[3] = over(dst[3], sa, sa);
                    }
                    Composite::SourceAtop => {
                        let da = dst[3];
                        dst[0] = r * sa * da + dst[0] * (1.0 - sa);
                        dst[1] = g * sa * da + dst[1] * (1.0 - sa);
                        dst[2] = b * sa * da + dst[2] * (1.0 - sa);
                    }
                }
            }
        }
    }

    /// Sum of alpha, used to compare how much a layer covers.
    pub fn coverage(&self) -> f32 {
        self.data.iter().map(|p| p[3]).sum()
    }
}
