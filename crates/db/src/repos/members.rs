//! Member repository.

use crate::error::DbResult;
use crate::models::{MemberRow, MemberWithFollows};
use async_trait::async_trait;

/// Repository for member operations.
#[async_trait]
pub trait MemberRepo: Send + Sync {
    /// Register a new member.
    async fn create_member(&self, username: &str, password: &str) -> DbResult<MemberRow>;

    /// Get a member by id.
    async fn get_member(&self, id: i64) -> DbResult<Option<MemberRow>>;

    /// Look up a member by id and exact password match, materializing its
    /// following and follower lists.
    ///
    /// Fails with `NotFound` when no member matches. The comparison is a
    /// plain equality check against the stored password.
    async fn login(&self, id: i64, password: &str) -> DbResult<MemberWithFollows>;

    /// Delete a member; dependent audio and follow rows cascade.
    async fn delete_member(&self, id: i64) -> DbResult<()>;
}
