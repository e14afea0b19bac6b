//! Blob storage for uploaded audio files.
//!
//! Audio payloads live on local disk under server-generated names; the
//! database only ever sees the opaque stored name. This crate provides:
//! - The [`BlobStore`] trait and streaming upload handle
//! - A filesystem backend with collision-free naming and path validation

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemStore;
pub use error::{StorageError, StorageResult};
pub use traits::{BlobStore, ByteStream, StreamingUpload};

use murmur_core::config::StorageConfig;
use std::sync::Arc;

/// Create a blob store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    let store = FilesystemStore::new(&config.audio_dir).await?;
    Ok(Arc::new(store) as Arc<dyn BlobStore>)
}
