//! Murmur server binary.

use anyhow::{Context, Result};
use clap::Parser;
use murmur_core::config::{AiConfig, AppConfig, DatabaseConfig, ServerConfig, StorageConfig};
use murmur_db::Database;
use murmur_server::{AiClient, AppState, create_router};
use murmur_storage::BlobStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Murmur - voice-letter backend server
#[derive(Parser, Debug)]
#[command(name = "murmurd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Database connection URL (sqlite:<path> or a MySQL URL)
    #[arg(long, env = "DB_URL")]
    db_url: String,

    /// Database username (MySQL)
    #[arg(long, env = "DB_USER")]
    db_user: Option<String>,

    /// Database password (MySQL)
    #[arg(long, env = "DB_PASSWORD")]
    db_password: Option<String>,

    /// Base URL of the external AI service
    #[arg(long, env = "AI_SERVER_URL")]
    ai_server_url: String,

    /// Bind address
    #[arg(long, env = "MURMUR_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Directory for stored audio files
    #[arg(long, env = "AUDIO_DIR", default_value = "./data/audio")]
    audio_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a .env file before clap reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Murmur v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig {
        server: ServerConfig { bind: args.bind },
        database: DatabaseConfig::from_env_url(&args.db_url, args.db_user, args.db_password),
        storage: StorageConfig {
            audio_dir: args.audio_dir,
        },
        ai: AiConfig {
            base_url: args.ai_server_url,
        },
    };

    // Initialize blob storage
    let blobs = murmur_storage::from_config(&config.storage)
        .await
        .context("failed to initialize audio storage")?;
    blobs
        .health_check()
        .await
        .context("audio storage health check failed")?;
    tracing::info!("Audio storage initialized");

    // Initialize the relational store (applies the schema)
    let db = murmur_db::from_config(&config.database)
        .await
        .context("failed to initialize database")?;
    db.health_check()
        .await
        .context("database health check failed")?;
    tracing::info!("Database initialized");

    // Outbound AI client
    let ai = AiClient::new(&config.ai.base_url).context("failed to create AI service client")?;

    let state = AppState::new(config.clone(), db, blobs, ai);
    let app = create_router(state);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
