//! # Rendering Module
//!
//! The cover pipeline: paper fill, halftone dots, title, encode.
//!
//! ## Modules
//!
//! - [`tone`]: Luminance to brightness (contrast, levels)
//! - [`halftone`]: Cover resampling and the (rotated) dot grid
//! - [`surface`]: Float RGB canvas, anti-aliased discs, layer compositing
//! - [`encode`]: Source decoding, JPEG/PNG output
//!
//! ## Usage Example
//!
//! ```
//! use covertone::{FontBook, RenderOptions, render::render_cover};
//! use image::{DynamicImage, Rgb, RgbImage};
//!
//! let photo = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([128, 128, 128])));
//! let opts = RenderOptions {
//!     title: "My Mix".to_string(),
//!     width: 256,
//!     height: 256,
//!     ..Default::default()
//! };
//!
//! let cover = render_cover(&photo, &opts, &FontBook::builtin())?;
//! assert_eq!(cover.format.mime_type(), "image/jpeg");
//! # Ok::<(), covertone::CovertoneError>(())
//! ```

pub mod encode;
pub mod halftone;
pub mod surface;
pub mod tone;

pub use encode::{EncodedCover, JPEG_QUALITY, OutputFormat, decode_source, encode};
pub use surface::Surface;
pub use tone::ToneMapper;

use image::{DynamicImage, RgbImage};
use std::time::Instant;

use crate::error::CovertoneError;
use crate::options::RenderOptions;
use crate::text::{FontBook, render_text};

/// Render the cover into an unencoded RGB buffer.
pub fn render_surface(source: &DynamicImage, opts: &RenderOptions, fonts: &FontBook) -> Result<RgbImage, CovertoneError> {
    opts.validate_dimensions()?;
    if source.width() == 0 || source.height() == 0 {
        return Err(CovertoneError::SourceDecode("image has no pixels".to_string()));
    }

    let started = Instant::now();
    let (paper, _) = opts.paper_and_ink();
    let mut surface = Surface::new(opts.width, opts.height, paper);

    let dots = halftone::render_halftone(&mut surface, source, opts);
    let halftone_done = started.elapsed();

    let fitted = render_text(&mut surface, opts, fonts);

    tracing::debug!(
        width = opts.width,
        height = opts.height,
        dots,
        text_size = fitted.as_ref().map(|f| f.size),
        halftone_ms = halftone_done.as_millis() as u64,
        total_ms = started.elapsed().as_millis() as u64,
        "cover rendered"
    );

    Ok(surface.to_rgb8())
}

/// Render and encode a cover.
pub fn render_cover(source: &DynamicImage, opts: &RenderOptions, fonts: &FontBook) -> Result<EncodedCover, CovertoneError> {
    render_cover_as(source, opts, fonts, OutputFormat::default())
}

/// Render and encode a cover in a specific format.
pub fn render_cover_as(
    source: &DynamicImage,
    opts: &RenderOptions,
    fonts: &FontBook,
    format: OutputFormat,
) -> Result<EncodedCover, CovertoneError> {
    let rgb = render_surface(source, opts, fonts)?;
    encode(&rgb, format)
}

/// Decode `bytes` and render a cover from them.
pub fn render_cover_bytes(
    bytes: &[u8],
    opts: &RenderOptions,
    fonts: &FontBook,
    format: OutputFormat,
) -> Result<EncodedCover, CovertoneError> {
    let source = decode_source(bytes)?;
    render_cover_as(&source, opts, fonts, format)
}

/// Download file name for a cover: whitespace runs become dashes, lower
/// case, `-cover.{ext}` suffix. An empty title gives `cover.{ext}`.
pub fn suggested_filename(title: &str, format: OutputFormat) -> String {
    let stem = title.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
    if stem.is_empty() {
        format!("cover.{}", format.extension())
    } else {
        format!("{}-cover.{}", stem, format.extension())
    }
}
