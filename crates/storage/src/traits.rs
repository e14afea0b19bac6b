//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;

/// A boxed stream of bytes for streaming reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Blob store abstraction for audio payloads.
///
/// Stored names are generated by the store and are the only handle callers
/// ever hold; the store guarantees two uploads never receive the same name.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Start a streaming upload for a new blob.
    ///
    /// The extension comes from the client-supplied filename and is sanitized
    /// before it becomes part of the stored name. Nothing is visible under
    /// the final name until [`StreamingUpload::finish`] succeeds.
    async fn put_stream(&self, extension: &str) -> StorageResult<Box<dyn StreamingUpload>>;

    /// Store a whole in-memory payload, returning the generated name.
    async fn put(&self, extension: &str, data: Bytes) -> StorageResult<String>;

    /// Open a stored blob as a byte stream.
    ///
    /// The underlying file handle is released when the stream is dropped,
    /// whether the read completes or fails.
    async fn open(&self, name: &str) -> StorageResult<ByteStream>;

    /// Resolve a stored name to its on-disk path.
    ///
    /// Fails with `NotFound` if no file exists under that name, and with
    /// `InvalidName` for names that would escape the storage directory.
    async fn resolve(&self, name: &str) -> StorageResult<PathBuf>;

    /// Check whether a stored name has a backing file.
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Delete a stored blob.
    async fn delete(&self, name: &str) -> StorageResult<()>;

    /// Verify the storage directory is accessible.
    async fn health_check(&self) -> StorageResult<()>;
}

/// Handle for an in-progress streaming upload.
#[async_trait]
pub trait StreamingUpload: Send {
    /// Append a chunk of data.
    async fn write(&mut self, data: Bytes) -> StorageResult<()>;

    /// Durably finish the upload and return the stored name.
    async fn finish(self: Box<Self>) -> StorageResult<String>;

    /// Abort the upload, removing any partially written data.
    async fn abort(self: Box<Self>) -> StorageResult<()>;
}
