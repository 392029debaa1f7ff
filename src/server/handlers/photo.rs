//! Photo upload and cover rendering API handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{FormatQuery, cover_response, reject};
use crate::options::RenderOptions;
use crate::render::{decode_source, render_cover_as};
use crate::server::state::{AppState, PhotoSession};

/// Response from upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// Pull the `image` field out of a multipart body, plus an optional
/// `options` field.
pub(super) async fn read_upload(
    multipart: &mut Multipart,
) -> Result<(Vec<u8>, String, Option<String>), (StatusCode, String)> {
    let mut image = None;
    let mut filename = String::from("unknown");
    let mut options = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                filename = field.file_name().unwrap_or("unknown").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e)))?;
                image = Some(bytes.to_vec());
            }
            "options" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read options: {}", e)))?;
                options = Some(text);
            }
            _ => {}
        }
    }

    let image = image.ok_or((StatusCode::BAD_REQUEST, "No image field found".to_string()))?;
    Ok((image, filename, options))
}

/// Parse an options body; an empty body means all defaults.
pub(super) fn parse_options(body: &[u8]) -> Result<RenderOptions, (StatusCode, String)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RenderOptions::default());
    }
    let text = std::str::from_utf8(body).map_err(|e| (StatusCode::BAD_REQUEST, format!("Options are not UTF-8: {}", e)))?;
    RenderOptions::from_json(text).map(RenderOptions::prepared).map_err(reject)
}

/// POST /api/photo/upload - Upload and decode a photo.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let (bytes, filename, _) = read_upload(&mut multipart).await?;

    // Decoding is CPU-bound
    let img = tokio::task::spawn_blocking(move || decode_source(&bytes))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Processing error: {}", e)))?
        .map_err(reject)?;

    let (width, height) = (img.width(), img.height());
    let session_id = Uuid::new_v4();
    {
        let mut sessions = state.photo_sessions.write().await;
        sessions.insert(session_id, PhotoSession::new(img, filename.clone()));
    }
    tracing::info!(id = %session_id, %filename, width, height, "photo uploaded");

    Ok(Json(UploadResponse {
        id: session_id.to_string(),
        filename,
        width,
        height,
    }))
}

/// POST /api/photo/:id/render - Render a cover from an uploaded photo.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<FormatQuery>,
    body: Bytes,
) -> Result<Response, (StatusCode, String)> {
    let session_id = Uuid::parse_str(&id).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))?;
    let format = query.output_format()?;
    let opts = parse_options(&body)?;

    // Get the image from session (minimize lock time)
    let source = {
        let mut sessions = state.photo_sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or((StatusCode::NOT_FOUND, "Session not found or expired".to_string()))?;
        session.touch();
        tracing::debug!(id = %session_id, filename = %session.filename, "rendering from session");
        session.image.clone()
    };

    let fonts = state.fonts.clone();
    let title = opts.title.clone();
    let cover = tokio::task::spawn_blocking(move || render_cover_as(&source, &opts, &fonts, format))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Processing error: {}", e)))?
        .map_err(reject)?;

    Ok(cover_response(cover, &title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_empty_body_is_default_options() {
        let opts = parse_options(b"").unwrap();
        assert_eq!(opts.width, 1080);
        assert_eq!(opts.color, Color::default());
        assert!(parse_options(b"  \n").is_ok());
    }

    #[test]
    fn test_options_are_prepared() {
        let opts = parse_options(br#"{"title": "my mix", "allCaps": true}"#).unwrap();
        assert_eq!(opts.title, "MY MIX");
    }

    #[test]
    fn test_bad_options_are_bad_request() {
        let (status, _) = parse_options(br#"{"color": "nope"}"#).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = parse_options(b"{").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
