//! Server test utilities.

use murmur_core::config::{AiConfig, AppConfig, DatabaseConfig, ServerConfig, StorageConfig};
use murmur_db::models::MemberRow;
use murmur_db::repos::MemberRepo;
use murmur_db::{Database, SqliteStore};
use murmur_server::{AiClient, AppState, create_router};
use murmur_storage::{BlobStore, FilesystemStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub audio_dir: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage and an unreachable
    /// AI upstream (fine for everything but the proxy tests).
    pub async fn new() -> Self {
        Self::with_ai_url("http://127.0.0.1:9").await
    }

    /// Create a new test server pointing at the given AI service URL.
    pub async fn with_ai_url(ai_url: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let audio_dir = temp_dir.path().join("audio");
        let blobs: Arc<dyn BlobStore> = Arc::new(
            FilesystemStore::new(&audio_dir)
                .await
                .expect("Failed to create blob store"),
        );

        let db_path = temp_dir.path().join("murmur.db");
        let db: Arc<dyn Database> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create database"),
        );

        let config = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig::Sqlite {
                path: db_path.clone(),
            },
            storage: StorageConfig {
                audio_dir: audio_dir.clone(),
            },
            ai: AiConfig {
                base_url: ai_url.to_string(),
            },
        };

        let ai = AiClient::new(ai_url).expect("Failed to create AI client");
        let state = AppState::new(config, db, blobs, ai);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            audio_dir,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying database.
    pub fn db(&self) -> Arc<dyn Database> {
        self.state.db.clone()
    }

    /// Register a member with a password derived from the username.
    pub async fn seed_member(&self, username: &str) -> MemberRow {
        self.db()
            .create_member(username, &format!("{username}-password"))
            .await
            .expect("Failed to create member")
    }

    /// Names of the files currently present in the audio directory,
    /// ignoring hidden temp files.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.audio_dir)
            .expect("Failed to read audio directory")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        names
    }
}
