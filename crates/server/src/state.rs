//! Application state shared across handlers.

use crate::ai::AiClient;
use murmur_core::config::AppConfig;
use murmur_db::Database;
use murmur_storage::BlobStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Relational store (members, audios, follows).
    pub db: Arc<dyn Database>,
    /// Audio blob store.
    pub blobs: Arc<dyn BlobStore>,
    /// Client for the external AI service.
    pub ai: AiClient,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        db: Arc<dyn Database>,
        blobs: Arc<dyn BlobStore>,
        ai: AiClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            blobs,
            ai,
        }
    }
}
