//! One-shot render API handler.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

use super::photo::{parse_options, read_upload};
use super::{FormatQuery, cover_response, reject};
use crate::render::render_cover_bytes;
use crate::server::state::AppState;

/// POST /api/render - Upload a photo with options and get the cover back.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FormatQuery>,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, String)> {
    let format = query.output_format()?;
    let (bytes, filename, options) = read_upload(&mut multipart).await?;
    let opts = parse_options(options.as_deref().unwrap_or("").as_bytes())?;

    tracing::debug!(%filename, title = %opts.title, effect = %opts.text_effect, "one-shot render");

    let fonts = state.fonts.clone();
    let title = opts.title.clone();
    let cover = tokio::task::spawn_blocking(move || render_cover_bytes(&bytes, &opts, &fonts, format))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Processing error: {}", e)))?
        .map_err(reject)?;

    Ok(cover_response(cover, &title))
}
