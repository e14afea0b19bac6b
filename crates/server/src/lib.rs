//! HTTP API server for the murmur voice-letter backend.
//!
//! This crate provides the HTTP surface:
//! - Multipart audio ingestion (metadata row + blob, consistent or failed)
//! - Audio metadata queries and file download streaming
//! - Member lookup, login, and follow-graph management
//! - Pass-through proxying to the external AI service

pub mod ai;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use ai::AiClient;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
