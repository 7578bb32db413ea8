//! Database initialization
//!
//! Opens (or creates) the SQLite file and ensures the three tables owned by the
//! persistence layer exist:
//! - `songs`: unique by (title, artist)
//! - `user_history`: append-only listen log
//! - `user_preferences`: unique by (user_id, tag)

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL lets concurrent resolutions read while one writer inserts
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
///
/// Public so tests can prepare in-memory pools.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_songs_table(pool).await?;
    create_user_history_table(pool).await?;
    create_user_preferences_table(pool).await?;

    info!("Database tables initialized (songs, user_history, user_preferences)");
    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            anime TEXT NOT NULL DEFAULT '',
            spotify_url TEXT,
            spotify_popularity INTEGER NOT NULL DEFAULT 0,
            youtube_url TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (title, artist)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_history_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            song_id INTEGER NOT NULL REFERENCES songs(id) ON DELETE CASCADE,
            score REAL NOT NULL DEFAULT 1.0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_history_user ON user_history(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_user_preferences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_preferences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            tag TEXT NOT NULL,
            weight REAL NOT NULL DEFAULT 1.0,
            UNIQUE (user_id, tag)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
