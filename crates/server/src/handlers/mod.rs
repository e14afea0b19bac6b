//! HTTP request handlers.

pub mod audio;
pub mod members;

pub use audio::*;
pub use members::*;

use crate::error::{ApiError, ApiResult};

/// Parse a path id; non-numeric values surface as not-found, the same
/// contract clients get for an absent record.
pub(crate) fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("id is not a number: {raw}")))
}
