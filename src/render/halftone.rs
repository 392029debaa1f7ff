//! # Halftone Rasterizer
//!
//! Paints the photo as a grid of ink dots on paper: darker regions get larger
//! dots, fully bright regions get none.
//!
//! ## Pipeline
//!
//! 1. The source is scaled to *cover* the surface (aspect preserved, overflow
//!    cropped, centered): the covered window is cut from the source and
//!    resampled once into a buffer the size of the surface.
//! 2. A grid with cell size `max(4, dot_size)` is walked over the surface.
//!    With rotation the grid lives in a frame rotated about the surface
//!    center, spanning the surface diagonal so the corners stay covered.
//! 3. Each grid point samples the buffer at its canvas position, maps it
//!    through the [`ToneMapper`] and becomes a dot of radius
//!    `(1 - brightness) * cell / 1.6`. Dots of radius 0.5 or less are dropped.
//!
//! ```text
//!   rotation = 0                rotation = 45
//!   ●  ●  ●  ●  ●                  ●     ●
//!   ●  ●  ●  ●  ●               ●     ●     ●
//!   ●  ●  ●  ●  ●                  ●     ●
//! ```
//!
//! Only the dot lattice rotates; sampling always reads the unrotated photo at
//! the dot's physical position.

use image::{DynamicImage, RgbImage, imageops::FilterType};
use rayon::prelude::*;

use super::surface::Surface;
use super::tone::ToneMapper;
use crate::options::RenderOptions;
use crate::shader::{rotate, trig_deg};

/// Smallest grid cell in pixels.
pub const MIN_CELL_SIZE: f32 = 4.0;

/// Full-black dots have radius `cell / RADIUS_DIVISOR`.
pub const RADIUS_DIVISOR: f32 = 1.6;

/// Dots at or below this radius are not painted (speckle suppression).
pub const MIN_DOT_RADIUS: f32 = 0.5;

/// A dot to paint, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Placement of a source image scaled to cover a target rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f32,
    /// Position of the scaled source's top-left corner on the target
    /// (zero or negative).
    pub offset_x: f32,
    pub offset_y: f32,
}

impl CoverFit {
    pub fn compute(src_width: u32, src_height: u32, dst_width: u32, dst_height: u32) -> Self {
        let scale = (dst_width as f32 / src_width as f32).max(dst_height as f32 / src_height as f32);
        Self {
            scale,
            offset_x: (dst_width as f32 - src_width as f32 * scale) / 2.0,
            offset_y: (dst_height as f32 - src_height as f32 * scale) / 2.0,
        }
    }
}

/// Grid cell size for a requested dot size.
#[inline]
pub fn cell_size(dot_size: f32) -> f32 {
    // NaN also lands on the floor
    if dot_size >= MIN_CELL_SIZE {
        dot_size
    } else {
        MIN_CELL_SIZE
    }
}

/// Dot radius for a brightness sample, or `None` when the dot is suppressed.
#[inline]
pub fn dot_radius(brightness: f32, cell: f32) -> Option<f32> {
    let radius = (1.0 - brightness) * (cell / RADIUS_DIVISOR);
    (radius > MIN_DOT_RADIUS).then_some(radius)
}

/// Resample `source` so it covers a `width` x `height` target.
///
/// Returned samples are premultiplied by source alpha, so transparent regions
/// read as black, like drawing onto a cleared offscreen canvas.
pub fn resample_cover(source: &DynamicImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = (source.width(), source.height());
    let fit = CoverFit::compute(src_w, src_h, width, height);

    // Source window that lands on the target; only it gets resized
    let crop_w = ((width as f32 / fit.scale).round() as u32).clamp(1, src_w);
    let crop_h = ((height as f32 / fit.scale).round() as u32).clamp(1, src_h);
    let crop_x = ((-fit.offset_x / fit.scale).round() as u32).min(src_w - crop_w);
    let crop_y = ((-fit.offset_y / fit.scale).round() as u32).min(src_h - crop_h);

    let window = source.crop_imm(crop_x, crop_y, crop_w, crop_h).to_rgba8();
    let scaled = image::imageops::resize(&window, width, height, FilterType::Triangle);

    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = scaled.get_pixel(x, y).0;
        let premul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        image::Rgb([premul(r), premul(g), premul(b)])
    })
}

/// Compute every dot for a resampled buffer.
///
/// Rows are sampled in parallel; the returned list is in row-major grid
/// order regardless of scheduling.
pub fn sample_grid(buffer: &RgbImage, tone: &ToneMapper, cell: f32, rotation_deg: i32) -> Vec<Dot> {
    let rows: Vec<Vec<Dot>> = if rotation_deg.rem_euclid(360) == 0 {
        let cols = (buffer.width() as f32 / cell).ceil() as usize;
        let rows = (buffer.height() as f32 / cell).ceil() as usize;
        (0..rows)
            .into_par_iter()
            .map(|j| axis_aligned_row(buffer, tone, cell, cols, j))
            .collect()
    } else {
        let (cos_a, sin_a) = trig_deg(rotation_deg as f32);
        let (w, h) = (buffer.width() as f32, buffer.height() as f32);
        let diag = (w * w + h * h).sqrt();
        let steps = (diag / cell).ceil() as usize;
        (0..steps)
            .into_par_iter()
            .map(|j| rotated_row(buffer, tone, cell, steps, j, cos_a, sin_a))
            .collect()
    };
    rows.into_iter().flatten().collect()
}

fn axis_aligned_row(buffer: &RgbImage, tone: &ToneMapper, cell: f32, cols: usize, j: usize) -> Vec<Dot> {
    let y = (j as f32 + 0.5) * cell;
    // Partial cells at the far edges sample the last row/column
    let sy = (y as u32).min(buffer.height() - 1);

    (0..cols)
        .filter_map(|i| {
            let x = (i as f32 + 0.5) * cell;
            let sx = (x as u32).min(buffer.width() - 1);
            let [r, g, b] = buffer.get_pixel(sx, sy).0;
            dot_radius(tone.map(r, g, b), cell).map(|radius| Dot { x, y, radius })
        })
        .collect()
}

fn rotated_row(
    buffer: &RgbImage,
    tone: &ToneMapper,
    cell: f32,
    steps: usize,
    j: usize,
    cos_a: f32,
    sin_a: f32,
) -> Vec<Dot> {
    let (w, h) = (buffer.width() as f32, buffer.height() as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let start = -(w * w + h * h).sqrt() / 2.0;
    let gy = start + j as f32 * cell;

    (0..steps)
        .filter_map(|i| {
            let gx = start + i as f32 * cell;
            let (rx, ry) = rotate(gx, gy, cos_a, sin_a);
            let (x, y) = (rx + cx, ry + cy);
            if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
                return None;
            }
            let [r, g, b] = buffer.get_pixel(x.floor() as u32, y.floor() as u32).0;
            dot_radius(tone.map(r, g, b), cell).map(|radius| Dot { x, y, radius })
        })
        .collect()
}

/// Paint the halftone layer: paper fill, then ink dots.
pub fn render_halftone(surface: &mut Surface, source: &DynamicImage, opts: &RenderOptions) -> usize {
    let (paper, ink) = opts.paper_and_ink();
    surface.fill(paper);

    let buffer = resample_cover(source, surface.width(), surface.height());
    let tone = ToneMapper::from_options(opts);
    let dots = sample_grid(&buffer, &tone, cell_size(opts.dot_size), opts.rotation);

    for dot in &dots {
        surface.fill_circle(dot.x, dot.y, dot.radius, ink);
    }

    dots.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255])))
    }

    #[test]
    fn test_cover_fit_landscape_into_square() {
        let fit = CoverFit::compute(200, 100, 100, 100);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.offset_x, -50.0);
        assert_eq!(fit.offset_y, 0.0);
    }

    #[test]
    fn test_cover_fit_upscales_small_sources() {
        let fit = CoverFit::compute(50, 100, 200, 200);
        assert_eq!(fit.scale, 4.0);
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, -100.0);
    }

    #[test]
    fn test_resample_cover_crops_center() {
        // Left half black, right half white, wide source
        let src = RgbaImage::from_fn(300, 100, |x, _| {
            if x < 150 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        });
        let buf = resample_cover(&DynamicImage::ImageRgba8(src), 100, 100);
        assert_eq!(buf.dimensions(), (100, 100));
        assert_eq!(buf.get_pixel(10, 50).0, [0, 0, 0]);
        assert_eq!(buf.get_pixel(90, 50).0, [255, 255, 255]);
    }

    #[test]
    fn test_resample_cover_extreme_aspect() {
        // 1 x 2000 strip: only the middle rows are dark, and only they land
        // on the target
        let src = RgbaImage::from_fn(1, 2000, |_, y| {
            if (900..1100).contains(&y) { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        });
        let buf = resample_cover(&DynamicImage::ImageRgba8(src), 1080, 1080);
        assert_eq!(buf.dimensions(), (1080, 1080));
        assert!(buf.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_resample_cover_upscaled_window() {
        // 50 x 100 into 200 x 200 keeps rows 25..75; the top quarter is red
        let src = RgbaImage::from_fn(50, 100, |_, y| {
            if y < 25 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        });
        let buf = resample_cover(&DynamicImage::ImageRgba8(src), 200, 200);
        assert_eq!(buf.dimensions(), (200, 200));
        assert!(buf.pixels().all(|p| p.0 == [0, 0, 255]));
    }

    #[test]
    fn test_resample_transparent_reads_black() {
        let src = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 0]));
        let buf = resample_cover(&DynamicImage::ImageRgba8(src), 10, 10);
        assert!(buf.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_cell_size_floor() {
        assert_eq!(cell_size(1.0), 4.0);
        assert_eq!(cell_size(-3.0), 4.0);
        assert_eq!(cell_size(f32::NAN), 4.0);
        assert_eq!(cell_size(12.0), 12.0);
    }

    #[test]
    fn test_dot_radius_threshold() {
        assert_eq!(dot_radius(1.0, 8.0), None);
        assert_eq!(dot_radius(0.0, 8.0), Some(5.0));
        // (1 - 0.95) * 5 = 0.25 -> suppressed
        assert_eq!(dot_radius(0.95, 8.0), None);
    }

    #[test]
    fn test_white_source_has_no_dots() {
        let buf = resample_cover(&solid(64, 64, 255), 64, 64);
        for rotation in [0, 15, 45] {
            let dots = sample_grid(&buf, &ToneMapper::default(), 8.0, rotation);
            assert!(dots.is_empty(), "rotation {} produced {} dots", rotation, dots.len());
        }
    }

    #[test]
    fn test_black_source_fills_every_cell() {
        let buf = resample_cover(&solid(64, 64, 0), 64, 64);
        let dots = sample_grid(&buf, &ToneMapper::default(), 8.0, 0);
        assert_eq!(dots.len(), 64);
        assert!(dots.iter().all(|d| d.radius == 8.0 / RADIUS_DIVISOR));
        assert_eq!(dots[0], Dot { x: 4.0, y: 4.0, radius: 5.0 });
        assert_eq!(dots[63].x, 60.0);
        assert_eq!(dots[63].y, 60.0);
    }

    #[test]
    fn test_partial_edge_cells_are_sampled() {
        let buf = resample_cover(&solid(30, 30, 0), 30, 30);
        let dots = sample_grid(&buf, &ToneMapper::default(), 8.0, 0);
        // ceil(30 / 8) = 4 cells per axis, the last center (28) still inside
        assert_eq!(dots.len(), 16);
    }

    #[test]
    fn test_rotated_grid_reaches_corners() {
        let (w, h) = (120u32, 80u32);
        let buf = resample_cover(&solid(w, h, 0), w, h);
        let cell = 8.0f32;
        for rotation in [0, 15, 45] {
            let dots = sample_grid(&buf, &ToneMapper::default(), cell, rotation);
            for &(px, py) in &[(0.0, 0.0), (w as f32, 0.0), (0.0, h as f32), (w as f32, h as f32)] {
                let nearest = dots
                    .iter()
                    .map(|d| ((d.x - px).powi(2) + (d.y - py).powi(2)).sqrt())
                    .fold(f32::MAX, f32::min);
                assert!(
                    nearest <= cell * 2.0,
                    "rotation {}: corner ({}, {}) nearest dot {} away",
                    rotation,
                    px,
                    py,
                    nearest
                );
            }
        }
    }

    #[test]
    fn test_rotated_dots_stay_inside_surface() {
        let buf = resample_cover(&solid(50, 70, 0), 50, 70);
        for rotation in [15, 45, -30, 400] {
            let dots = sample_grid(&buf, &ToneMapper::default(), 6.0, rotation);
            assert!(!dots.is_empty());
            assert!(dots.iter().all(|d| d.x >= 0.0 && d.x < 50.0 && d.y >= 0.0 && d.y < 70.0));
        }
    }

    #[test]
    fn test_sample_grid_deterministic() {
        let src = RgbaImage::from_fn(97, 61, |x, y| Rgba([(x * 2) as u8, (y * 4) as u8, 90, 255]));
        let buf = resample_cover(&DynamicImage::ImageRgba8(src), 80, 80);
        let a = sample_grid(&buf, &ToneMapper::default(), 5.0, 15);
        let b = sample_grid(&buf, &ToneMapper::default(), 5.0, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_halftone_paper_and_ink() {
        let opts = RenderOptions {
            width: 32,
            height: 32,
            color: Color::rgb(255, 0, 0),
            ..Default::default()
        };
        let mut surface = Surface::new(32, 32, Color::BLACK);
        let dots = render_halftone(&mut surface, &solid(32, 32, 255), &opts);
        assert_eq!(dots, 0);
        assert_eq!(surface.pixel(5, 5), [1.0, 1.0, 1.0]);

        let dots = render_halftone(&mut surface, &solid(32, 32, 0), &opts);
        assert_eq!(dots, 16);
        // Cell center carries ink
        assert_eq!(surface.pixel(4, 4), [1.0, 0.0, 0.0]);
    }
}
