//! Audio repository.

use crate::error::DbResult;
use crate::models::{AudioRecord, NewAudio};
use async_trait::async_trait;

/// Repository for voice-letter rows.
#[async_trait]
pub trait AudioRepo: Send + Sync {
    /// Insert a new audio row.
    ///
    /// Owner and receiver are both looked up inside the same transaction as
    /// the insert; either missing fails the whole operation with `NotFound`
    /// and no row becomes visible. The creation timestamp is assigned here.
    async fn create_audio(&self, audio: &NewAudio) -> DbResult<AudioRecord>;

    /// Get an audio record by id, with owner and receiver resolved.
    async fn get_audio(&self, id: i64) -> DbResult<Option<AudioRecord>>;

    /// All audio records owned (sent) by the given member.
    async fn audios_by_owner(&self, owner_id: i64) -> DbResult<Vec<AudioRecord>>;

    /// All audio records received by the given member.
    async fn audios_by_receiver(&self, receiver_id: i64) -> DbResult<Vec<AudioRecord>>;
}
