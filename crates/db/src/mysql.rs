//! MySQL-based relational store implementation.

use crate::error::{DbError, DbResult};
use crate::models::*;
use crate::repos::{AudioRepo, FollowRepo, MemberRepo};
use crate::store::Database;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use std::str::FromStr;
use time::OffsetDateTime;

/// MySQL schema (applied idempotently, one statement at a time).
const MYSQL_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    username VARCHAR(255) NOT NULL,
    password VARCHAR(255) NOT NULL
);

CREATE TABLE IF NOT EXISTS audios (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    owner_id BIGINT NOT NULL,
    receiver_id BIGINT NOT NULL,
    title VARCHAR(255) NOT NULL,
    file_name VARCHAR(255) NOT NULL,
    text TEXT NOT NULL,
    process_text TEXT NOT NULL,
    created_at TIMESTAMP(6) NOT NULL,
    INDEX idx_audios_owner (owner_id),
    INDEX idx_audios_receiver (receiver_id),
    CONSTRAINT fk_audios_owner FOREIGN KEY (owner_id)
        REFERENCES members(id) ON DELETE CASCADE,
    CONSTRAINT fk_audios_receiver FOREIGN KEY (receiver_id)
        REFERENCES members(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS follows (
    follower_id BIGINT NOT NULL,
    followee_id BIGINT NOT NULL,
    PRIMARY KEY (follower_id, followee_id),
    CONSTRAINT fk_follows_follower FOREIGN KEY (follower_id)
        REFERENCES members(id) ON DELETE CASCADE,
    CONSTRAINT fk_follows_followee FOREIGN KEY (followee_id)
        REFERENCES members(id) ON DELETE CASCADE
);
"#;

fn schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// MySQL-based relational store.
pub struct MySqlStore {
    pool: Pool<MySql>,
}

impl MySqlStore {
    /// Create a new MySQL store from a connection URL plus separately
    /// supplied credentials, applying the schema.
    pub async fn new(
        url: &str,
        user: Option<&str>,
        password: Option<&str>,
        max_connections: u32,
    ) -> DbResult<Self> {
        let mut opts = MySqlConnectOptions::from_str(url)?;

        if let Some(user) = user {
            opts = opts.username(user);
        }
        if let Some(password) = password {
            opts = opts.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<MySql> {
        &self.pool
    }
}

#[async_trait]
impl Database for MySqlStore {
    async fn migrate(&self) -> DbResult<()> {
        // MySQL rejects multi-statement queries by default
        for statement in schema_statements(MYSQL_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Shared join projection for audio queries.
const AUDIO_SELECT: &str = r#"
    SELECT a.id, a.title, a.file_name, a.text, a.process_text, a.created_at,
           o.id AS owner_id, o.username AS owner_username,
           r.id AS receiver_id, r.username AS receiver_username
    FROM audios a
    JOIN members o ON o.id = a.owner_id
    JOIN members r ON r.id = a.receiver_id
"#;

#[async_trait]
impl MemberRepo for MySqlStore {
    async fn create_member(&self, username: &str, password: &str) -> DbResult<MemberRow> {
        let result = sqlx::query("INSERT INTO members (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password)
            .execute(&self.pool)
            .await?;

        Ok(MemberRow {
            id: result.last_insert_id() as i64,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    async fn get_member(&self, id: i64) -> DbResult<Option<MemberRow>> {
        let row = sqlx::query_as::<_, MemberRow>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn login(&self, id: i64, password: &str) -> DbResult<MemberWithFollows> {
        let member =
            sqlx::query_as::<_, MemberRow>("SELECT * FROM members WHERE id = ? AND password = ?")
                .bind(id)
                .bind(password)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| {
                    DbError::NotFound("no member matches the given credentials".into())
                })?;

        let following = self.following_of(member.id).await?;
        let followers = self.followers_of(member.id).await?;

        Ok(MemberWithFollows {
            id: member.id,
            username: member.username,
            following: following.into_iter().map(MemberSummary::from).collect(),
            followers: followers.into_iter().map(MemberSummary::from).collect(),
        })
    }

    async fn delete_member(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("member {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioRepo for MySqlStore {
    async fn create_audio(&self, audio: &NewAudio) -> DbResult<AudioRecord> {
        let mut tx = self.pool.begin().await?;

        let owner = sqlx::query_as::<_, MemberRow>("SELECT * FROM members WHERE id = ?")
            .bind(audio.owner_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("member {} not found", audio.owner_id)))?;

        let receiver = sqlx::query_as::<_, MemberRow>("SELECT * FROM members WHERE id = ?")
            .bind(audio.receiver_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("member {} not found", audio.receiver_id)))?;

        let created_at = OffsetDateTime::now_utc();
        let result = sqlx::query(
            r#"
            INSERT INTO audios (owner_id, receiver_id, title, file_name, text, process_text, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(audio.owner_id)
        .bind(audio.receiver_id)
        .bind(&audio.title)
        .bind(&audio.file_name)
        .bind(&audio.text)
        .bind(&audio.process_text)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_id() as i64;
        tx.commit().await?;

        Ok(AudioRecord {
            id,
            title: audio.title.clone(),
            owner: owner.into(),
            receiver: receiver.into(),
            file_name: audio.file_name.clone(),
            text: audio.text.clone(),
            process_text: audio.process_text.clone(),
            created_at,
        })
    }

    async fn get_audio(&self, id: i64) -> DbResult<Option<AudioRecord>> {
        let query = format!("{AUDIO_SELECT} WHERE a.id = ?");
        let row = sqlx::query_as::<_, AudioJoinRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AudioRecord::from))
    }

    async fn audios_by_owner(&self, owner_id: i64) -> DbResult<Vec<AudioRecord>> {
        let query = format!("{AUDIO_SELECT} WHERE a.owner_id = ?");
        let rows = sqlx::query_as::<_, AudioJoinRow>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(AudioRecord::from).collect())
    }

    async fn audios_by_receiver(&self, receiver_id: i64) -> DbResult<Vec<AudioRecord>> {
        let query = format!("{AUDIO_SELECT} WHERE a.receiver_id = ?");
        let rows = sqlx::query_as::<_, AudioJoinRow>(&query)
            .bind(receiver_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(AudioRecord::from).collect())
    }
}

#[async_trait]
impl FollowRepo for MySqlStore {
    async fn create_follow(&self, follower_id: i64, followee_id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        for id in [follower_id, followee_id] {
            sqlx::query_scalar::<_, i64>("SELECT id FROM members WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::NotFound(format!("member {id} not found")))?;
        }

        // Fast-path check for a clean error message; the composite primary
        // key is the authoritative duplicate defense under races.
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT follower_id FROM follows WHERE follower_id = ? AND followee_id = ?",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(DbError::AlreadyExists(format!(
                "member {follower_id} already follows member {followee_id}"
            )));
        }

        for (a, b) in [(follower_id, followee_id), (followee_id, follower_id)] {
            sqlx::query("INSERT INTO follows (follower_id, followee_id) VALUES (?, ?)")
                .bind(a)
                .bind(b)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DbError::from_insert(e, || {
                        format!("member {follower_id} already follows member {followee_id}")
                    })
                })?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn following_of(&self, member_id: i64) -> DbResult<Vec<MemberRow>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id, m.username, m.password
            FROM members m
            JOIN follows f ON f.followee_id = m.id
            WHERE f.follower_id = ?
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn followers_of(&self, member_id: i64) -> DbResult<Vec<MemberRow>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id, m.username, m.password
            FROM members m
            JOIN follows f ON f.follower_id = m.id
            WHERE f.followee_id = ?
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_splits_into_three_statements() {
        let statements = schema_statements(MYSQL_SCHEMA);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS members"));
        assert!(statements[2].contains("PRIMARY KEY (follower_id, followee_id)"));
    }
}
