//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Database backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// Embedded SQLite database (development and tests).
    Sqlite {
        /// Path to the database file.
        path: PathBuf,
    },
    /// MySQL server (production).
    Mysql {
        /// Connection URL (e.g., "mysql://host:3306/murmur").
        url: String,
        /// Username, if not carried in the URL.
        user: Option<String>,
        /// Password, if not carried in the URL.
        password: Option<String>,
        /// Maximum pool connections.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    /// Build a database configuration from the `DB_URL` / `DB_USER` /
    /// `DB_PASSWORD` environment values.
    ///
    /// A `sqlite:` URL selects the embedded backend; anything else is treated
    /// as a MySQL connection URL with separately supplied credentials.
    pub fn from_env_url(url: &str, user: Option<String>, password: Option<String>) -> Self {
        if let Some(path) = url.strip_prefix("sqlite:") {
            Self::Sqlite {
                path: PathBuf::from(path),
            }
        } else {
            Self::Mysql {
                url: url.to_string(),
                user,
                password,
                max_connections: default_max_connections(),
            }
        }
    }
}

/// Audio blob storage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding stored audio files.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("./data/audio")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
        }
    }
}

/// Upstream AI service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiConfig {
    /// Base URL of the AI service (transcription and recommendations).
    pub base_url: String,
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub ai: AiConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_url_selects_embedded_backend() {
        let config = DatabaseConfig::from_env_url("sqlite:./data/murmur.db", None, None);
        match config {
            DatabaseConfig::Sqlite { path } => {
                assert_eq!(path, PathBuf::from("./data/murmur.db"));
            }
            other => panic!("expected sqlite config, got {other:?}"),
        }
    }

    #[test]
    fn mysql_url_keeps_credentials() {
        let config = DatabaseConfig::from_env_url(
            "mysql://db.internal:3306/murmur",
            Some("app".to_string()),
            Some("secret".to_string()),
        );
        match config {
            DatabaseConfig::Mysql {
                url,
                user,
                password,
                max_connections,
            } => {
                assert_eq!(url, "mysql://db.internal:3306/murmur");
                assert_eq!(user.as_deref(), Some("app"));
                assert_eq!(password.as_deref(), Some("secret"));
                assert_eq!(max_connections, 10);
            }
            other => panic!("expected mysql config, got {other:?}"),
        }
    }
}
