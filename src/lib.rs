//! # Covertone - Halftone Playlist Cover Renderer
//!
//! Covertone turns a photo, a title and an accent color into a square cover
//! image: the photo becomes a (possibly rotated) halftone dot grid in the
//! accent color, and the title is set on top with one of eleven text effects.
//!
//! ## Quick Start
//!
//! ```no_run
//! use covertone::{FontBook, RenderOptions, TextEffect, render};
//!
//! let photo = image::open("photo.jpg")?;
//! let fonts = FontBook::discover(&[]);
//!
//! let opts = RenderOptions {
//!     title: "Late Night Drive".to_string(),
//!     color: "#ff4500".parse()?,
//!     rotation: 45,
//!     text_effect: TextEffect::Neon,
//!     ..Default::default()
//! }
//! .prepared();
//!
//! let cover = render::render_cover(&photo, &opts, &fonts)?;
//! std::fs::write(render::suggested_filename(&opts.title, cover.format), &cover.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Tone mapping, halftone grid, surface, encoding |
//! | [`text`] | Fonts, size fitting, text effects |
//! | [`options`] | Render options record |
//! | [`color`] | Accent colors and presets |
//! | [`shader`] | Numeric primitives |
//! | [`server`] | HTTP preview service |
//! | [`error`] | Error types |

pub mod color;
pub mod error;
pub mod options;
pub mod render;
pub mod server;
pub mod shader;
pub mod text;

// Re-exports for convenience
pub use color::{Color, PRESETS};
pub use error::CovertoneError;
pub use options::{FontFamily, RenderOptions, TextEffect};
pub use render::{EncodedCover, OutputFormat, render_cover};
pub use text::FontBook;
