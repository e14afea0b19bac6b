//! Relational store error types.

use thiserror::Error;

/// Relational store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relational store operations.
pub type DbResult<T> = std::result::Result<T, DbError>;

impl DbError {
    /// Map an insert error, converting unique-key violations into
    /// `AlreadyExists` with the given message.
    pub(crate) fn from_insert(e: sqlx::Error, exists_msg: impl FnOnce() -> String) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::AlreadyExists(exists_msg())
            }
            _ => Self::Database(e),
        }
    }
}
