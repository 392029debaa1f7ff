//! # HTTP Preview Service
//!
//! Renders covers over HTTP. A client uploads a photo once and then asks for
//! covers with successive option records, the way an editor previews while
//! the user moves sliders.
//!
//! ## Usage
//!
//! ```bash
//! covertone serve --listen 0.0.0.0:8080 --font-dir ./fonts
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | POST | `/api/photo/upload` | multipart `image` | `{id, filename, width, height}` |
//! | POST | `/api/photo/:id/render` | JSON options | JPEG (`?format=png` for PNG) |
//! | POST | `/api/render` | multipart `image` + `options` | JPEG / PNG |
//! | GET | `/api/catalog` | | fonts, effects, presets, defaults |

mod handlers;
mod state;

pub use state::{AppState, PhotoSession, SESSION_EXPIRATION_SECS, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::error::CovertoneError;

/// Maximum upload size.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/catalog", get(handlers::catalog::get))
        // Photo API (50MB limit for uploads)
        .route(
            "/api/photo/upload",
            post(handlers::photo::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/photo/:id/render", post(handlers::photo::render))
        .route(
            "/api/render",
            post(handlers::render::render).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use covertone::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), covertone::CovertoneError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".parse().unwrap(),
///     font_dirs: vec!["./fonts".into()],
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CovertoneError> {
    let listen_addr = config.listen_addr;
    let app_state = Arc::new(AppState::new(&config));
    tracing::info!(fonts = ?app_state.fonts.families(), "font book loaded");

    // Spawn background session cleanup task
    tokio::spawn(cleanup_sessions(app_state.clone()));

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(|e| CovertoneError::Server(format!("Failed to bind to {}: {}", listen_addr, e)))?;
    tracing::info!(%listen_addr, "covertone HTTP server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| CovertoneError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to drop idle photo sessions.
async fn cleanup_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    let expiration = Duration::from_secs(SESSION_EXPIRATION_SECS);

    loop {
        interval.tick().await;
        let removed = state.prune_sessions(expiration).await;
        if removed > 0 {
            let remaining = state.photo_sessions.read().await.len();
            tracing::info!(removed, remaining, "cleaned up expired photo sessions");
        }
    }
}
