//! Follow repository.

use crate::error::DbResult;
use crate::models::MemberRow;
use async_trait::async_trait;

/// Repository for the follow graph.
///
/// A follow between two members is undirected at the application level: one
/// `create_follow` call inserts both the (follower, followee) and the
/// (followee, follower) row, atomically.
#[async_trait]
pub trait FollowRepo: Send + Sync {
    /// Create a follow relationship between two members.
    ///
    /// Fails with `NotFound` if either member is missing and with
    /// `AlreadyExists` if the edge is already present. The composite primary
    /// key on (follower, followee) backs the duplicate check against
    /// concurrent callers.
    async fn create_follow(&self, follower_id: i64, followee_id: i64) -> DbResult<()>;

    /// Members the given member follows.
    async fn following_of(&self, member_id: i64) -> DbResult<Vec<MemberRow>>;

    /// Members following the given member.
    async fn followers_of(&self, member_id: i64) -> DbResult<Vec<MemberRow>>;
}
