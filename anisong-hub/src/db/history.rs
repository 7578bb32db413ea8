//! Listening history (append-only)

use anisong_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// Score recorded when a search surfaces a song
pub const DEFAULT_SCORE: f64 = 1.0;

/// One encounter of a user with a stored song
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserHistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub song_id: i64,
    pub score: f64,
    pub created_at: String,
}

/// Append a history row; never deduplicates
pub async fn save_history(
    pool: &SqlitePool,
    user_id: i64,
    song_id: i64,
    score: f64,
) -> Result<UserHistoryEntry> {
    let entry = sqlx::query_as::<_, UserHistoryEntry>(
        r#"
        INSERT INTO user_history (user_id, song_id, score)
        VALUES (?, ?, ?)
        RETURNING id, user_id, song_id, score, created_at
        "#,
    )
    .bind(user_id)
    .bind(song_id)
    .bind(score)
    .fetch_one(pool)
    .await?;

    tracing::debug!(user_id, song_id, history_id = entry.id, "Recorded history entry");
    Ok(entry)
}

/// Most recent history entries for a user, newest first
pub async fn list_history(
    pool: &SqlitePool,
    user_id: i64,
    limit: u32,
) -> Result<Vec<UserHistoryEntry>> {
    let entries = sqlx::query_as::<_, UserHistoryEntry>(
        r#"
        SELECT id, user_id, song_id, score, created_at
        FROM user_history
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
