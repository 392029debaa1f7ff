//! # Error Types
//!
//! This module defines error types used throughout the covertone library.
//!
//! Font resolution failures, degenerate levels and an exhausted fit budget are
//! not errors: the pipeline degrades instead of failing (see [`crate::text::font`],
//! [`crate::render::tone`] and [`crate::text::fit`]).

use thiserror::Error;

/// Main error type for covertone operations
#[derive(Debug, Error)]
pub enum CovertoneError {
    /// The supplied source raster could not be decoded
    #[error("Source decode error: {0}")]
    SourceDecode(String),

    /// Accent color is not a valid hex RGB string
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Output surface is empty or too large
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Malformed options record
    #[error("Options error: {0}")]
    Options(String),

    /// Output codec failure
    #[error("Encode error: {0}")]
    Encode(String),

    /// HTTP server failure (bind, accept)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CovertoneError {
    fn from(e: serde_json::Error) -> Self {
        CovertoneError::Options(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CovertoneError::InvalidDimensions {
            width: 0,
            height: 1080,
        };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x1080");

        let err = CovertoneError::InvalidColor("#zzz".to_string());
        assert_eq!(err.to_string(), "Invalid color: #zzz");
    }

    #[test]
    fn test_json_error_maps_to_options() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: CovertoneError = parse.unwrap_err().into();
        assert!(matches!(err, CovertoneError::Options(_)));
    }
}
