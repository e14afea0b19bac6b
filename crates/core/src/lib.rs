//! Shared types for the murmur voice-letter backend.
//!
//! This crate defines the configuration model used across all other crates:
//! - Server bind settings
//! - Database backend selection
//! - Audio blob storage location
//! - Upstream AI service location

pub mod config;

pub use config::{AiConfig, AppConfig, DatabaseConfig, ServerConfig, StorageConfig};

/// Maximum length for audio titles and stored file names (varchar columns).
pub const MAX_NAME_LEN: usize = 255;
