//! # Title Effects
//!
//! Each effect is a short list of passes over one [`GlyphRun`]. A pass fills
//! a coverage mask (the glyphs, a stroke band around them, or either one at
//! an offset) with a paint, optionally preceded by a canvas-style shadow: a
//! blurred (`sigma = blur / 2`) and offset copy of the same mask, tinted.
//!
//! All passes draw into one [`Layer`] covering the run's frame; the caller
//! composites it onto the surface. Sizes are relative to the fitted em size
//! `S`.
//!
//! | Effect   | Passes                                                       |
//! |----------|--------------------------------------------------------------|
//! | classic  | white stroke 0.06S, accent fill                              |
//! | metallic | glowing white fill, dark fill with drop shadow, chrome fill  |
//! | neon     | accent stroke 0.03S glowing twice, white fill                |
//! | echo     | six fading accent copies trailing down-right, white fill     |
//! | glow     | white fill over a wide then a tight accent aura              |
//! | shadow   | half-black copy at 0.05S, white stroke 0.04S, accent fill    |
//! | retro3d  | twelve stacked dark layers, white stroke 0.05S, accent fill  |
//! | outline  | accent stroke 0.05S                                          |
//! | gradient | accent fill, white sheen source-atop                         |
//!
//! `glitch` and `glass` draw as classic.

use super::font::Face;
use super::layer::{Composite, Layer, LinearGradient, Paint, Rgba, rgba};
use super::mask::{Frame, Mask};
use crate::color::Color;
use crate::options::TextEffect;

/// Offset step of the echo copies, in em.
const ECHO_STEP: f32 = 0.015;
const ECHO_COPIES: u32 = 6;
/// Offset step of the retro3d layers, in em.
const RETRO_STEP: f32 = 0.015;
const RETRO_LAYERS: u32 = 12;

const METAL_STOPS: [(f32, Color); 5] = [
    (0.0, Color::rgb(0xc8, 0xc8, 0xc8)),
    (0.25, Color::rgb(0xf0, 0xf0, 0xf0)),
    (0.45, Color::rgb(0xff, 0xff, 0xff)),
    (0.65, Color::rgb(0xe0, 0xe0, 0xe0)),
    (1.0, Color::rgb(0xa0, 0xa0, 0xa0)),
];

/// The title laid out at its fitted size, centered on an anchor.
///
/// The frame spans the em box plus room for the widest blur and offset any
/// effect uses, clipped to the same margin around the surface.
pub struct GlyphRun<'a> {
    face: &'a Face,
    text: &'a str,
    size: f32,
    anchor: (f32, f32),
    pen_x: f32,
    baseline: f32,
    frame: Frame,
}

impl<'a> GlyphRun<'a> {
    /// Center `text` horizontally on `anchor.0` and its em box vertically on
    /// `anchor.1`, on a surface of `bounds` pixels.
    pub fn layout(face: &'a Face, text: &'a str, size: f32, anchor: (f32, f32), bounds: (u32, u32)) -> Self {
        let width = face.measure(text, size);
        let metrics = face.v_metrics(size);
        let pen_x = anchor.0 - width / 2.0;
        let baseline = anchor.1 + metrics.middle_to_baseline();

        let pad = (0.75 * size).ceil() as i64 + 4;
        let left = (pen_x.floor() as i64 - pad).max(-pad);
        let right = ((pen_x + width).ceil() as i64 + pad).min(bounds.0 as i64 + pad);
        let top = ((baseline - metrics.ascent).floor() as i64 - pad).max(-pad);
        let bottom = ((baseline - metrics.descent).ceil() as i64 + pad).min(bounds.1 as i64 + pad);

        let frame = Frame {
            x0: left as i32,
            y0: top as i32,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        };

        Self {
            face,
            text,
            size,
            anchor,
            pen_x,
            baseline,
            frame,
        }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Glyph coverage with the run shifted by `(dx, dy)`.
    pub fn coverage(&self, dx: f32, dy: f32) -> Mask {
        let mut mask = Mask::empty(self.frame);
        if self.frame.is_empty() {
            return mask;
        }
        self.face
            .rasterize(self.text, self.size, self.pen_x + dx, self.baseline + dy, |x, y, c| mask.add(x, y, c));
        mask
    }

    /// Vertical gradient spanning `[-extent, extent]` around the anchor row.
    fn gradient(&self, extent: f32, stops: Vec<(f32, Rgba)>) -> Paint {
        Paint::Gradient(LinearGradient::vertical(self.anchor.1 - extent, self.anchor.1 + extent, stops))
    }
}

/// Canvas-style shadow settings for one pass.
#[derive(Debug, Clone, Copy)]
struct Shadow {
    color: Rgba,
    /// Canvas `shadowBlur`; the gaussian sigma is half of it.
    blur: f32,
    offset: (f32, f32),
}

impl Shadow {
    fn glow(color: Rgba, blur: f32) -> Self {
        Self {
            color,
            blur,
            offset: (0.0, 0.0),
        }
    }
}

/// Fill `shape` with `paint`, drawing `shadow` underneath first.
fn pass(layer: &mut Layer, shape: &Mask, paint: &Paint, shadow: Option<Shadow>) {
    if let Some(shadow) = shadow {
        // Shadow opacity follows the paint's own alpha
        let source_alpha = match paint {
            Paint::Solid(c) => c[3],
            Paint::Gradient(_) => 1.0,
        };
        let [r, g, b, a] = shadow.color;
        let alpha = a * source_alpha;
        if alpha > 0.0 && (shadow.blur > 0.0 || shadow.offset != (0.0, 0.0)) {
            let cast = shape.translated(shadow.offset.0, shadow.offset.1).blur(shadow.blur / 2.0);
            layer.fill(&cast, &Paint::Solid([r, g, b, alpha]), Composite::SourceOver);
        }
    }
    layer.fill(shape, paint, Composite::SourceOver);
}

/// Paint `run` with `effect` into a fresh layer.
pub fn paint(run: &GlyphRun, accent: Color, effect: TextEffect) -> Layer {
    let mut layer = Layer::new(run.frame());
    if run.frame().is_empty() {
        return layer;
    }
    let s = run.size();
    let glyphs = run.coverage(0.0, 0.0);
    let white = Paint::solid(Color::WHITE);
    let ink = Paint::solid(accent);

    match effect {
        TextEffect::Classic | TextEffect::Glitch | TextEffect::Glass => {
            pass(&mut layer, &glyphs.stroke(0.06 * s), &white, None);
            pass(&mut layer, &glyphs, &ink, None);
        }
        TextEffect::Metallic => {
            let blur = 0.15 * s;
            pass(
                &mut layer,
                &glyphs,
                &white,
                Some(Shadow::glow(rgba(Color::WHITE, 0.4), blur)),
            );
            pass(
                &mut layer,
                &glyphs,
                &Paint::solid(Color::rgb(0x1a, 0x1a, 0x1a)),
                Some(Shadow {
                    color: rgba(Color::BLACK, 0.7),
                    blur,
                    offset: (0.04 * s, 0.04 * s),
                }),
            );
            let stops = METAL_STOPS.iter().map(|&(at, c)| (at, rgba(c, 1.0))).collect();
            pass(&mut layer, &glyphs, &run.gradient(s / 1.8, stops), None);
        }
        TextEffect::Neon => {
            let tube = glyphs.stroke(0.03 * s);
            let glow = rgba(accent, 1.0);
            pass(&mut layer, &tube, &ink, Some(Shadow::glow(glow, 0.15 * s)));
            pass(&mut layer, &tube, &ink, Some(Shadow::glow(glow, 0.3 * s)));
            pass(&mut layer, &glyphs, &white, None);
        }
        TextEffect::Echo => {
            for i in (1..=ECHO_COPIES).rev() {
                let alpha = ((1.0 - i as f32 / ECHO_COPIES as f32) * 40.0).floor() / 255.0;
                let offset = i as f32 * ECHO_STEP * s;
                pass(
                    &mut layer,
                    &run.coverage(offset, offset),
                    &Paint::Solid(rgba(accent, alpha)),
                    None,
                );
            }
            pass(&mut layer, &glyphs, &white, None);
        }
        TextEffect::Glow => {
            let aura = rgba(accent, 1.0);
            pass(&mut layer, &glyphs, &white, Some(Shadow::glow(aura, 0.4 * s)));
            pass(&mut layer, &glyphs, &white, Some(Shadow::glow(aura, 0.1 * s)));
        }
        TextEffect::Shadow => {
            let offset = 0.05 * s;
            pass(
                &mut layer,
                &run.coverage(offset, offset),
                &Paint::Solid(rgba(Color::BLACK, 0.5)),
                None,
            );
            pass(&mut layer, &glyphs.stroke(0.04 * s), &white, None);
            pass(&mut layer, &glyphs, &ink, None);
        }
        TextEffect::Retro3d => {
            for i in (1..=RETRO_LAYERS).rev() {
                let alpha = 0.25 - (i as f32 / RETRO_LAYERS as f32) * 0.15;
                let offset = i as f32 * RETRO_STEP * s;
                pass(
                    &mut layer,
                    &run.coverage(offset, offset),
                    &Paint::Solid(rgba(Color::BLACK, alpha)),
                    Some(Shadow::glow(rgba(Color::BLACK, alpha * 0.5), 0.02 * s)),
                );
            }
            pass(&mut layer, &glyphs.stroke(0.05 * s), &white, None);
            pass(&mut layer, &glyphs, &ink, None);
        }
        TextEffect::Outline => {
            pass(&mut layer, &glyphs.stroke(0.05 * s), &ink, None);
        }
        TextEffect::Gradient => {
            pass(&mut layer, &glyphs, &ink, None);
            let sheen = run.gradient(
                s / 2.0,
                vec![(0.0, rgba(Color::WHITE, 0.0)), (1.0, rgba(Color::WHITE, 0.35))],
            );
            layer.fill(&glyphs, &sheen, Composite::SourceAtop);
        }
    }

    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 48.0;

    fn run(face: &Face) -> GlyphRun<'_> {
        GlyphRun::layout(face, "AB", SIZE, (100.0, 100.0), (200, 200))
    }

    fn layer_for(effect: TextEffect) -> Layer {
        let face = Face::Bitmap;
        paint(&run(&face), Color::rgb(0x1d, 0xb9, 0x54), effect)
    }

    fn same(a: &Layer, b: &Layer) -> bool {
        a.origin() == b.origin()
            && a.width() == b.width()
            && a.height() == b.height()
            && (0..a.height()).all(|y| (0..a.width()).all(|x| a.pixel(x, y) == b.pixel(x, y)))
    }

    #[test]
    fn test_layout_centers_on_anchor() {
        let face = Face::Bitmap;
        let r = run(&face);
        // Two 24px cells centered on x = 100
        assert_eq!(r.pen_x, 76.0);
        let frame = r.frame();
        assert!(frame.x0 < 76 && frame.x0 + frame.width as i32 > 124);
        let glyphs = r.coverage(0.0, 0.0);
        assert!(glyphs.total() > 0.0);
    }

    #[test]
    fn test_frame_is_clipped_near_surface() {
        let face = Face::Bitmap;
        let r = GlyphRun::layout(&face, "WIDE TITLE", 180.0, (540.0, 540.0), (100, 100));
        let pad = (0.75f32 * 180.0).ceil() as i32 + 4;
        let frame = r.frame();
        assert!(frame.x0 >= -pad);
        assert!(frame.x0 + frame.width as i32 <= 100 + pad);
    }

    #[test]
    fn test_glitch_and_glass_match_classic() {
        let classic = layer_for(TextEffect::Classic);
        assert!(same(&classic, &layer_for(TextEffect::Glitch)));
        assert!(same(&classic, &layer_for(TextEffect::Glass)));
        assert!(same(&classic, &layer_for(TextEffect::from_id("sparkle"))));
    }

    #[test]
    fn test_outline_leaves_interior_empty() {
        let face = Face::Bitmap;
        let r = GlyphRun::layout(&face, "HB", 120.0, (150.0, 100.0), (300, 200));
        let glyphs = r.coverage(0.0, 0.0);
        let outline = paint(&r, Color::WHITE, TextEffect::Outline);
        let stroke = glyphs.stroke(0.05 * 120.0);

        // Pixels deep inside a glyph stroke are never painted
        for y in 0..outline.height() {
            for x in 0..outline.width() {
                if glyphs.get(x, y) == 1.0 && stroke.get(x, y) == 0.0 {
                    assert_eq!(outline.pixel(x, y)[3], 0.0);
                }
            }
        }
        let classic = paint(&r, Color::WHITE, TextEffect::Classic);
        assert!(outline.coverage() < classic.coverage());
    }

    #[test]
    fn test_gradient_stays_on_glyphs() {
        let face = Face::Bitmap;
        let r = run(&face);
        let glyphs = r.coverage(0.0, 0.0);
        let layer = paint(&r, Color::rgb(0x1d, 0xb9, 0x54), TextEffect::Gradient);
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                if glyphs.get(x, y) == 0.0 {
                    assert_eq!(layer.pixel(x, y), [0.0; 4]);
                }
            }
        }
        assert!((layer.coverage() - glyphs.total()).abs() < 1e-2);
    }

    #[test]
    fn test_shadowed_effects_spread_beyond_glyphs() {
        let glyph_total = {
            let face = Face::Bitmap;
            run(&face).coverage(0.0, 0.0).total()
        };
        for effect in [TextEffect::Glow, TextEffect::Neon, TextEffect::Metallic, TextEffect::Echo] {
            let layer = layer_for(effect);
            assert!(layer.coverage() > glyph_total, "{} should reach past the glyphs", effect);
        }
    }

    #[test]
    fn test_classic_fill_is_accent() {
        let face = Face::Bitmap;
        let r = run(&face);
        let glyphs = r.coverage(0.0, 0.0);
        let layer = paint(&r, Color::rgb(255, 0, 0), TextEffect::Classic);
        // The opaque fill hides the stroke beneath it
        let (x, y) = (0..layer.height())
            .flat_map(|y| (0..layer.width()).map(move |x| (x, y)))
            .find(|&(x, y)| glyphs.get(x, y) == 1.0)
            .expect("fully covered glyph pixel");
        assert_eq!(layer.pixel(x, y), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_every_effect_paints_something() {
        for effect in TextEffect::ALL {
            assert!(layer_for(effect).coverage() > 0.0, "{}", effect);
        }
    }

    #[test]
    fn test_empty_frame_paints_nothing() {
        let face = Face::Bitmap;
        let r = GlyphRun::layout(&face, "A", 10.0, (-500.0, -500.0), (50, 50));
        assert_eq!(paint(&r, Color::WHITE, TextEffect::Glow).coverage(), 0.0);
    }

    #[test]
    fn test_outline_glyphs_stay_inside_frame() {
        let mut book = crate::text::FontBook::builtin();
        book.insert("Inter", include_bytes!("fonts/DejaVuSans-Bold.ttf").to_vec())
            .unwrap();
        let face = book.resolve(crate::options::FontFamily::Inter);
        let r = GlyphRun::layout(&face, "Wavy Jog", 120.0, (300.0, 200.0), (600, 400));
        let frame = r.frame();

        let mut plotted = 0;
        face.rasterize(r.text, r.size, r.pen_x, r.baseline, |x, y, _| {
            plotted += 1;
            assert!(x >= frame.x0 && x < frame.x0 + frame.width as i32, "x {} outside frame", x);
            assert!(y >= frame.y0 && y < frame.y0 + frame.height as i32, "y {} outside frame", y);
        });
        assert!(plotted > 0);

        assert!(r.coverage(0.0, 0.0).total() > 0.0);
    }
}
