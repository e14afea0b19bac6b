//! Database models mapping to the relational schema.

use sqlx::FromRow;
use time::OffsetDateTime;

/// Member identity record.
#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// The public identity snippet of a member (no password).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: i64,
    pub username: String,
}

impl From<MemberRow> for MemberSummary {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
        }
    }
}

/// A member together with its resolved follow lists, as returned by login.
#[derive(Debug, Clone)]
pub struct MemberWithFollows {
    pub id: i64,
    pub username: String,
    pub following: Vec<MemberSummary>,
    pub followers: Vec<MemberSummary>,
}

/// Fields for a new audio row; the id and timestamp are server-assigned.
#[derive(Debug, Clone)]
pub struct NewAudio {
    pub owner_id: i64,
    pub receiver_id: i64,
    pub title: String,
    pub file_name: String,
    pub text: String,
    pub process_text: String,
}

/// Flat row shape for audio queries joined against both member rows.
#[derive(Debug, Clone, FromRow)]
pub struct AudioJoinRow {
    pub id: i64,
    pub title: String,
    pub file_name: String,
    pub text: String,
    pub process_text: String,
    pub created_at: OffsetDateTime,
    pub owner_id: i64,
    pub owner_username: String,
    pub receiver_id: i64,
    pub receiver_username: String,
}

/// One persisted voice letter with resolved owner and receiver identities.
#[derive(Debug, Clone)]
pub struct AudioRecord {
    pub id: i64,
    pub title: String,
    pub owner: MemberSummary,
    pub receiver: MemberSummary,
    pub file_name: String,
    pub text: String,
    pub process_text: String,
    pub created_at: OffsetDateTime,
}

impl From<AudioJoinRow> for AudioRecord {
    fn from(row: AudioJoinRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            owner: MemberSummary {
                id: row.owner_id,
                username: row.owner_username,
            },
            receiver: MemberSummary {
                id: row.receiver_id,
                username: row.receiver_username,
            },
            file_name: row.file_name,
            text: row.text,
            process_text: row.process_text,
            created_at: row.created_at,
        }
    }
}
