//! Local filesystem storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::{BlobStore, ByteStream, StreamingUpload};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Default chunk size for streaming reads (64 KiB).
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Maximum length kept from a client-supplied file extension.
const MAX_EXTENSION_LEN: usize = 16;

/// Local filesystem blob store.
///
/// Stored names are `<uuid>.<extension>`; a missing extension leaves a
/// trailing dot. The directory is flat: names never contain separators.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Create a new filesystem store, creating the directory if missing.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Generate a collision-free stored name for the given extension.
    fn unique_name(extension: &str) -> String {
        format!("{}.{}", Uuid::new_v4(), sanitize_extension(extension))
    }

    /// Get the full path for a stored name, rejecting traversal attempts.
    ///
    /// Stored names are server-generated and flat, so anything containing a
    /// separator, a parent reference, or a non-normal path component is a
    /// forged name and refused.
    fn blob_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty() {
            return Err(StorageError::InvalidName("empty name".to_string()));
        }
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StorageError::InvalidName(format!(
                "path traversal not allowed: {name}"
            )));
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(std::path::Component::Normal(_)), None) => {}
            _ => {
                return Err(StorageError::InvalidName(format!(
                    "contains unsafe path component: {name}"
                )));
            }
        }

        Ok(self.root.join(name))
    }
}

/// Keep only ASCII alphanumerics from a client-supplied extension.
fn sanitize_extension(extension: &str) -> String {
    extension
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_LEN)
        .collect()
}

#[async_trait]
impl BlobStore for FilesystemStore {
    #[instrument(skip(self))]
    async fn put_stream(&self, extension: &str) -> StorageResult<Box<dyn StreamingUpload>> {
        let name = Self::unique_name(extension);
        let final_path = self.blob_path(&name)?;

        // Write to a hidden temp file, rename on finish for atomicity
        let temp_path = self.root.join(format!(".tmp.{}", Uuid::new_v4()));
        let file = fs::File::create(&temp_path).await?;

        Ok(Box::new(FilesystemUpload {
            file,
            temp_path,
            final_path,
            name,
        }))
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, extension: &str, data: Bytes) -> StorageResult<String> {
        let mut upload = self.put_stream(extension).await?;
        upload.write(data).await?;
        upload.finish().await
    }

    #[instrument(skip(self))]
    async fn open(&self, name: &str) -> StorageResult<ByteStream> {
        use tokio::io::AsyncReadExt;

        let path = self.resolve(name).await?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        // Stream the file in chunks instead of loading it into memory
        let stream = async_stream::try_stream! {
            let mut file = file;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        };

        Ok(Box::pin(stream))
    }

    #[instrument(skip(self))]
    async fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        let path = self.blob_path(name)?;
        match fs::try_exists(&path).await {
            Ok(true) => Ok(path),
            Ok(false) => Err(StorageError::NotFound(name.to_string())),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    #[instrument(skip(self))]
    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.blob_path(name)?;
        fs::try_exists(&path).await.map_err(StorageError::Io)
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.blob_path(name)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root)
            .await
            .map_err(|e| StorageError::Config(format!("storage directory not accessible: {e}")))?;

        if !metadata.is_dir() {
            return Err(StorageError::Config(
                "storage path is not a directory".to_string(),
            ));
        }

        Ok(())
    }
}

/// Streaming upload writing through a temp file.
struct FilesystemUpload {
    file: fs::File,
    temp_path: PathBuf,
    final_path: PathBuf,
    name: String,
}

#[async_trait]
impl StreamingUpload for FilesystemUpload {
    async fn write(&mut self, data: Bytes) -> StorageResult<()> {
        self.file.write_all(&data).await?;
        Ok(())
    }

    async fn finish(self: Box<Self>) -> StorageResult<String> {
        // Flush to disk before the rename makes the blob visible
        self.file.sync_all().await?;
        drop(self.file);
        fs::rename(&self.temp_path, &self.final_path).await?;
        Ok(self.name)
    }

    async fn abort(self: Box<Self>) -> StorageResult<()> {
        drop(self.file);
        let _ = fs::remove_file(&self.temp_path).await;
        Ok(())
    }
}
