//! # Title Layer
//!
//! Fits the title to the canvas, lays it out on its anchor and paints it
//! with the selected effect.
//!
//! - [`font`]: Font resolution with a built-in fallback face
//! - [`fit`]: Shrink-to-fit sizing
//! - [`mask`]: Coverage masks, strokes, blurs
//! - [`layer`]: Premultiplied RGBA layer and paints
//! - [`effects`]: The effect recipes

pub mod effects;
pub mod fit;
pub mod font;
pub mod layer;
pub mod mask;

pub use effects::{GlyphRun, paint};
pub use fit::{FittedText, fit};
pub use font::{Face, FontBook};

use crate::options::RenderOptions;
use crate::render::surface::Surface;

/// Draw `opts.title` onto `surface`. An empty title draws nothing and
/// returns `None`.
pub fn render_text(surface: &mut Surface, opts: &RenderOptions, fonts: &FontBook) -> Option<FittedText> {
    if opts.title.is_empty() {
        return None;
    }

    let face = fonts.resolve(opts.font);
    let fitted = fit(&face, &opts.title, opts.font, opts.text_size, surface.width());
    let anchor = (opts.text_x * surface.width() as f32, opts.text_y * surface.height() as f32);

    let run = GlyphRun::layout(&face, &opts.title, fitted.size, anchor, (surface.width(), surface.height()));
    let layer = paint(&run, opts.color, opts.text_effect);
    surface.composite(&layer);

    tracing::debug!(
        font = %fitted.font_string(),
        face = face.family(),
        effect = %opts.text_effect,
        iterations = fitted.iterations,
        "title drawn"
    );
    Some(fitted)
}
