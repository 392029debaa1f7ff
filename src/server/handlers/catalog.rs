//! Catalog of everything a client can choose from.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::color::{PRESETS, Preset};
use crate::options::{FontFamily, RenderOptions, TextEffect};
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct EffectInfo {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FontInfo {
    pub name: &'static str,
    /// Whether an outline face for this family was found; otherwise the
    /// title renders with a fallback face.
    pub installed: bool,
}

#[derive(Debug, Serialize)]
pub struct Catalog {
    pub fonts: Vec<FontInfo>,
    pub effects: Vec<EffectInfo>,
    pub presets: &'static [Preset],
    pub defaults: RenderOptions,
}

/// Build the catalog for a set of installed font families.
pub fn catalog(installed: &[String]) -> Catalog {
    let fonts = FontFamily::ALL
        .iter()
        .map(|f| FontInfo {
            name: f.name(),
            installed: installed.iter().any(|k| k.eq_ignore_ascii_case(f.name())),
        })
        .collect();
    let effects = TextEffect::ALL
        .iter()
        .map(|e| EffectInfo {
            id: e.id(),
            label: e.label(),
        })
        .collect();

    Catalog {
        fonts,
        effects,
        presets: PRESETS,
        defaults: RenderOptions::default(),
    }
}

/// GET /api/catalog - Fonts, effects, presets and default options.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(catalog(&state.fonts.families()))
}
