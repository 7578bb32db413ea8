//! Song database operations
//!
//! Songs are unique by (title, artist). Inserting an existing pair is a no-op
//! that returns the row already stored.

use anisong_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::ResolvedSong;

/// Persisted song row
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StoredSong {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub anime: String,
    pub spotify_url: Option<String>,
    pub spotify_popularity: i64,
    pub youtube_url: Option<String>,
}

/// Store a resolved song, or return the existing row for its (title, artist)
///
/// The unique constraint decides the winner when two writers race on the same
/// pair; both then read back the same row.
pub async fn save_song(pool: &SqlitePool, resolved: &ResolvedSong) -> Result<StoredSong> {
    let title = resolved.candidate.song_title.as_str();
    let artist = resolved.candidate.artist_credit();

    let inserted = sqlx::query(
        r#"
        INSERT INTO songs (title, artist, anime, spotify_url, spotify_popularity, youtube_url)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(title, artist) DO NOTHING
        "#,
    )
    .bind(title)
    .bind(&artist)
    .bind(&resolved.candidate.anime)
    .bind(&resolved.spotify_url)
    .bind(resolved.spotify_popularity.map(i64::from).unwrap_or(0))
    .bind(&resolved.youtube_url)
    .execute(pool)
    .await?
    .rows_affected();

    let song = sqlx::query_as::<_, StoredSong>(
        r#"
        SELECT id, title, artist, anime, spotify_url, spotify_popularity, youtube_url
        FROM songs
        WHERE title = ? AND artist = ?
        "#,
    )
    .bind(title)
    .bind(&artist)
    .fetch_one(pool)
    .await?;

    if inserted == 1 {
        tracing::debug!(song_id = song.id, title = %title, artist = %artist, "Stored new song");
    } else {
        tracing::debug!(song_id = song.id, title = %title, artist = %artist, "Song already stored");
    }

    Ok(song)
}

/// Load song by id
pub async fn load_song(pool: &SqlitePool, id: i64) -> Result<StoredSong> {
    let song = sqlx::query_as::<_, StoredSong>(
        r#"
        SELECT id, title, artist, anime, spotify_url, spotify_popularity, youtube_url
        FROM songs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    song.ok_or(Error::SongNotFound(id))
}
