//! HTTP handlers for the server.

pub mod catalog;
pub mod photo;
pub mod render;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::CovertoneError;
use crate::render::{EncodedCover, OutputFormat, suggested_filename};

/// `?format=` query shared by the render endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    #[serde(default)]
    pub format: Option<String>,
}

impl FormatQuery {
    pub fn output_format(&self) -> Result<OutputFormat, (StatusCode, String)> {
        match self.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("jpg") | Some("jpeg") => Ok(OutputFormat::default()),
            Some("png") => Ok(OutputFormat::Png),
            Some(other) => Err((StatusCode::BAD_REQUEST, format!("Unsupported format: {}", other))),
        }
    }
}

/// Status code for a pipeline error.
pub fn error_status(err: &CovertoneError) -> StatusCode {
    match err {
        CovertoneError::SourceDecode(_)
        | CovertoneError::InvalidColor(_)
        | CovertoneError::InvalidDimensions { .. }
        | CovertoneError::Options(_) => StatusCode::BAD_REQUEST,
        CovertoneError::Encode(_) | CovertoneError::Server(_) | CovertoneError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn reject(err: CovertoneError) -> (StatusCode, String) {
    (error_status(&err), err.to_string())
}

/// `Content-Disposition` value for a download name.
///
/// The quoted `filename` is plain ASCII (quotes, backslashes, controls and
/// non-ASCII characters become `_`); names that needed replacing also get a
/// percent-encoded `filename*` carrying the UTF-8 original.
pub fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && !matches!(c, '"' | '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if fallback == name {
        return format!("inline; filename=\"{}\"", name);
    }

    let mut encoded = String::with_capacity(name.len() * 3);
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    format!("inline; filename=\"{}\"; filename*=UTF-8''{}", fallback, encoded)
}

/// Encoded cover as an image response with a download name.
pub fn cover_response(cover: EncodedCover, title: &str) -> Response {
    let disposition = content_disposition(&suggested_filename(title, cover.format));
    let mut response = ([(header::CONTENT_TYPE, cover.format.mime_type())], cover.bytes).into_response();
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
