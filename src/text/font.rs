//! Font resolution for title rendering.
//!
//! Title families are looked up by file name in the configured font
//! directories (`Heavitas.ttf`, `Inter-Black.otf`, `Cocogoose-Pro-Bold.ttf`,
//! ...). For every family the heaviest upright file wins, since titles are
//! set at weight 900.
//!
//! A family that cannot be found is not an error. Resolution walks the
//! fallback chain
//!
//! ```text
//! requested family -> Inter -> common sans families -> built-in bitmap face
//! ```
//!
//! and logs a warning. The built-in face (Spleen 12x24, scaled) is always
//! available, so rendering never fails for lack of fonts.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CovertoneError;
use crate::options::FontFamily;

/// Sans families tried after Inter, in order.
const SANS_FALLBACKS: &[&str] = &[
    "dejavusans",
    "liberationsans",
    "notosans",
    "roboto",
    "opensans",
    "arial",
    "helvetica",
];

/// Built-in bitmap cell size.
const BITMAP_CELL_W: usize = 12;
const BITMAP_CELL_H: usize = 24;
/// Rows above the baseline in the built-in cell.
const BITMAP_ASCENT_ROWS: f32 = 19.0;

/// A resolved typeface.
#[derive(Clone)]
pub enum Face {
    /// Outline font loaded from disk.
    Outline { family: String, font: FontArc },
    /// Built-in bitmap face, scaled to size.
    Bitmap,
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Face::Outline { family, .. } => write!(f, "Face::Outline({})", family),
            Face::Bitmap => f.write_str("Face::Bitmap"),
        }
    }
}

/// Vertical metrics at a given em size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VMetrics {
    /// Distance from baseline to the top of the em box (positive).
    pub ascent: f32,
    /// Distance from baseline to the bottom of the em box (negative).
    pub descent: f32,
}

impl VMetrics {
    /// Offset from the em-box middle down to the baseline.
    pub fn middle_to_baseline(&self) -> f32 {
        (self.ascent + self.descent) / 2.0
    }
}

impl Face {
    pub fn family(&self) -> &str {
        match self {
            Face::Outline { family, .. } => family,
            Face::Bitmap => "builtin",
        }
    }

    /// Advance width of `text` at em size `px`, kerning included.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            Face::Outline { font, .. } => {
                let scaled = font.as_scaled(em_scale(font, px));
                let mut width = 0.0f32;
                let mut prev = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = prev {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            Face::Bitmap => text.chars().count() as f32 * bitmap_advance(px),
        }
    }

    pub fn v_metrics(&self, px: f32) -> VMetrics {
        match self {
            Face::Outline { font, .. } => {
                let scaled = font.as_scaled(em_scale(font, px));
                VMetrics {
                    ascent: scaled.ascent(),
                    descent: scaled.descent(),
                }
            }
            Face::Bitmap => {
                let scale = px / BITMAP_CELL_H as f32;
                VMetrics {
                    ascent: BITMAP_ASCENT_ROWS * scale,
                    descent: -(BITMAP_CELL_H as f32 - BITMAP_ASCENT_ROWS) * scale,
                }
            }
        }
    }

    /// Rasterize `text` with its pen starting at `(pen_x, baseline)`.
    ///
    /// `plot(x, y, coverage)` receives integer pixel positions in the same
    /// coordinate space as the pen; coverage is in (0, 1].
    pub fn rasterize<F>(&self, text: &str, px: f32, pen_x: f32, baseline: f32, mut plot: F)
    where
        F: FnMut(i32, i32, f32),
    {
        match self {
            Face::Outline { font, .. } => {
                let scale = em_scale(font, px);
                let scaled = font.as_scaled(scale);
                let mut caret = pen_x;
                let mut prev = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = prev {
                        caret += scaled.kern(prev, id);
                    }
                    let glyph = id.with_scale_and_position(scale, point(caret, baseline));
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|gx, gy, coverage| {
                            if coverage > 0.0 {
                                plot(gx as i32 + bounds.min.x as i32, gy as i32 + bounds.min.y as i32, coverage);
                            }
                        });
                    }
                    caret += scaled.h_advance(id);
                    prev = Some(id);
                }
            }
            Face::Bitmap => rasterize_bitmap(text, px, pen_x, baseline, plot),
        }
    }
}

/// Scale whose em square is `px` pixels tall (ab_glyph scales by line height).
fn em_scale(font: &FontArc, px: f32) -> PxScale {
    let height = font.height_unscaled();
    let units_per_em = font.units_per_em().unwrap_or(height);
    PxScale::from(px * height / units_per_em)
}

fn bitmap_advance(px: f32) -> f32 {
    BITMAP_CELL_W as f32 * px / BITMAP_CELL_H as f32
}

/// 4x4 supersampled box filter over the scaled Spleen cells.
fn rasterize_bitmap<F>(text: &str, px: f32, pen_x: f32, baseline: f32, mut plot: F)
where
    F: FnMut(i32, i32, f32),
{
    const SUB: usize = 4;

    let Ok(mut spleen) = PSF2Font::new(FONT_12X24) else {
        return;
    };
    let scale = px / BITMAP_CELL_H as f32;
    let advance = bitmap_advance(px);
    let top = baseline - BITMAP_ASCENT_ROWS * scale;
    let mut buf = [0u8; 4];

    for (index, ch) in text.chars().enumerate() {
        let mut cell = [false; BITMAP_CELL_W * BITMAP_CELL_H];
        let Some(glyph) = spleen.glyph_for_utf8(ch.encode_utf8(&mut buf).as_bytes()) else {
            continue;
        };
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                if row_y < BITMAP_CELL_H && col_x < BITMAP_CELL_W {
                    cell[row_y * BITMAP_CELL_W + col_x] = on;
                }
            }
        }

        let left = pen_x + index as f32 * advance;
        let x0 = left.floor() as i32;
        let x1 = (left + advance).ceil() as i32;
        let y0 = top.floor() as i32;
        let y1 = (top + px).ceil() as i32;

        for y in y0..y1 {
            for x in x0..x1 {
                let mut hits = 0usize;
                for sy in 0..SUB {
                    for sx in 0..SUB {
                        let fx = (x as f32 + (sx as f32 + 0.5) / SUB as f32 - left) / scale;
                        let fy = (y as f32 + (sy as f32 + 0.5) / SUB as f32 - top) / scale;
                        if fx < 0.0 || fy < 0.0 {
                            continue;
                        }
                        let (cx, cy) = (fx as usize, fy as usize);
                        if cx < BITMAP_CELL_W && cy < BITMAP_CELL_H && cell[cy * BITMAP_CELL_W + cx] {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    plot(x, y, hits as f32 / (SUB * SUB) as f32);
                }
            }
        }
    }
}

/// Weight rank of a font file from its style suffix; higher is heavier.
/// Italic styles rank below every upright style.
fn style_rank(style: &str) -> i32 {
    let style = style.to_ascii_lowercase();
    let italic = style.contains("italic") || style.contains("oblique");
    let weight = if style.contains("black") || style.contains("heavy") {
        900
    } else if style.contains("extrabold") || style.contains("ultrabold") {
        800
    } else if style.contains("semibold") || style.contains("demibold") {
        600
    } else if style.contains("bold") {
        700
    } else if style.contains("medium") {
        500
    } else if style.contains("extralight") || style.contains("ultralight") {
        200
    } else if style.contains("light") {
        300
    } else if style.contains("thin") || style.contains("hairline") {
        100
    } else {
        400
    };
    if italic { weight - 1000 } else { weight }
}

/// Lookup key of a family name: lower case, alphanumerics only.
fn family_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Split a font file stem into `(family key, style)`.
///
/// `Inter-Black` -> (`inter`, `Black`), `Inter[wght]` -> (`inter`, ``),
/// `Heavitas` -> (`heavitas`, ``).
fn split_stem(stem: &str) -> (String, &str) {
    let stem = stem.split('[').next().unwrap_or(stem);
    match stem.find(['-', '_']) {
        Some(i) => (family_key(&stem[..i]), &stem[i + 1..]),
        None => (family_key(stem), ""),
    }
}

/// Platform font directories searched after the configured ones.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

/// Title fonts available to the renderer.
///
/// Built once per process and shared read-only between renders.
#[derive(Debug, Clone, Default)]
pub struct FontBook {
    faces: HashMap<String, Face>,
}

impl FontBook {
    /// A book with no outline fonts: every family resolves to the built-in face.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load title families from `dirs` (searched in order, earlier wins).
    ///
    /// Only the families a render can ask for (the title families plus the
    /// fallback chain) are loaded; other files are indexed and skipped.
    pub fn load(dirs: &[PathBuf]) -> Self {
        let wanted: Vec<String> = FontFamily::ALL
            .iter()
            .map(|f| family_key(f.name()))
            .chain(SANS_FALLBACKS.iter().map(|s| s.to_string()))
            .collect();

        // family key -> (rank, path); first directory wins ties
        let mut best: HashMap<String, (i32, PathBuf)> = HashMap::new();
        for dir in dirs {
            let mut files = Vec::new();
            collect_font_files(dir, &mut files);
            files.sort();
            for path in files {
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let (key, style) = split_stem(stem);
                if !wanted.contains(&key) {
                    continue;
                }
                let rank = style_rank(style);
                if best.get(&key).is_none_or(|(existing, _)| rank > *existing) {
                    best.insert(key, (rank, path));
                }
            }
        }

        let mut book = Self::default();
        for (key, (_, path)) in best {
            match std::fs::read(&path)
                .map_err(CovertoneError::from)
                .and_then(|data| book.insert(&key, data))
            {
                Ok(()) => tracing::debug!(family = %key, path = %path.display(), "loaded font"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font"),
            }
        }
        book
    }

    /// Load from `extra_dirs` followed by the platform font directories.
    pub fn discover(extra_dirs: &[PathBuf]) -> Self {
        let mut dirs = extra_dirs.to_vec();
        dirs.extend(system_font_dirs());
        Self::load(&dirs)
    }

    /// Register font data under a family name.
    pub fn insert(&mut self, family: &str, data: Vec<u8>) -> Result<(), CovertoneError> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| CovertoneError::Options(format!("Invalid font data for '{}': {}", family, e)))?;
        let key = family_key(family);
        self.faces.insert(
            key.clone(),
            Face::Outline {
                family: key,
                font,
            },
        );
        Ok(())
    }

    /// Family keys with an outline face loaded, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.faces.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Resolve a title family through the fallback chain.
    pub fn resolve(&self, family: FontFamily) -> Face {
        let requested = family_key(family.name());
        let chain = std::iter::once(requested.as_str())
            .chain(std::iter::once("inter"))
            .chain(SANS_FALLBACKS.iter().copied());

        for (depth, key) in chain.enumerate() {
            if let Some(face) = self.faces.get(key) {
                if depth > 0 {
                    tracing::warn!(requested = %family, using = %key, "font unavailable, using fallback");
                }
                return face.clone();
            }
        }

        if !self.faces.is_empty() {
            tracing::warn!(requested = %family, "font unavailable, using built-in face");
        } else {
            tracing::debug!(requested = %family, "no outline fonts loaded, using built-in face");
        }
        Face::Bitmap
    }
}

fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, out);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"))
        {
            out.push(path);
        }
    }
}
