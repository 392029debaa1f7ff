//! Server state and configuration.

use image::DynamicImage;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::text::FontBook;

/// Idle time after which an uploaded photo is dropped.
pub const SESSION_EXPIRATION_SECS: u64 = 30 * 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: SocketAddr,
    /// Font directories searched before the platform ones
    pub font_dirs: Vec<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            font_dirs: Vec::new(),
        }
    }
}

/// An uploaded, decoded photo.
pub struct PhotoSession {
    pub image: Arc<DynamicImage>,
    pub filename: String,
    pub last_accessed: Instant,
}

impl PhotoSession {
    pub fn new(image: DynamicImage, filename: String) -> Self {
        Self {
            image: Arc::new(image),
            filename,
            last_accessed: Instant::now(),
        }
    }

    /// Mark the session as used.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }

    pub fn is_expired(&self, now: Instant, expiration: Duration) -> bool {
        now.duration_since(self.last_accessed) >= expiration
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub fonts: Arc<FontBook>,
    pub photo_sessions: RwLock<HashMap<Uuid, PhotoSession>>,
}

impl AppState {
    /// State with fonts discovered from the configured and platform directories.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_fonts(FontBook::discover(&config.font_dirs))
    }

    pub fn with_fonts(fonts: FontBook) -> Self {
        Self {
            fonts: Arc::new(fonts),
            photo_sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Drop sessions idle for longer than `expiration`; returns how many
    /// were removed.
    pub async fn prune_sessions(&self, expiration: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.photo_sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, expiration));
        before - sessions.len()
    }
}
