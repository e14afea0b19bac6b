//! Relational store abstraction and implementations for murmur.
//!
//! This crate owns the three record types of the voice-letter domain:
//! - Members (identity rows referenced by everything else)
//! - Audios (one voice letter: owner, receiver, texts, stored file name)
//! - Follows (directed edges; one logical follow inserts both directions)
//!
//! Two backends implement the combined [`Database`] trait: SQLite for
//! development and tests, MySQL for production deployments.

pub mod error;
pub mod models;
pub mod mysql;
pub mod repos;
pub mod store;

pub use error::{DbError, DbResult};
pub use mysql::MySqlStore;
pub use store::{Database, SqliteStore};

use murmur_core::config::DatabaseConfig;
use std::sync::Arc;

/// Create a database from configuration.
pub async fn from_config(config: &DatabaseConfig) -> DbResult<Arc<dyn Database>> {
    match config {
        DatabaseConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn Database>)
        }
        DatabaseConfig::Mysql {
            url,
            user,
            password,
            max_connections,
        } => {
            tracing::info!("Connecting to MySQL");
            let store =
                MySqlStore::new(url, user.as_deref(), password.as_deref(), *max_connections)
                    .await?;
            Ok(Arc::new(store) as Arc<dyn Database>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_sqlite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("murmur.db");
        let config = DatabaseConfig::Sqlite {
            path: db_path.clone(),
        };

        let db = from_config(&config).await.unwrap();
        db.health_check().await.unwrap();
        assert!(db_path.exists());
    }
}
