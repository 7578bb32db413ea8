//! Preference engine
//!
//! Per-user tag weights, where a tag is an artist name or an anime title.
//! Reinforcing a tag adds 1 to its weight, creating it at 1 when absent. No
//! decay or upper bound.

use anisong_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;

/// Weight accumulated for one (user, tag)
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserPreference {
    pub id: i64,
    pub user_id: i64,
    pub tag: String,
    pub weight: f64,
}

/// Add 1 to every tag's weight for `user_id`, committing all tags together
///
/// Blank tags are skipped. A tag repeated in `tags` is reinforced once per
/// occurrence.
pub async fn reinforce<S: AsRef<str>>(pool: &SqlitePool, user_id: i64, tags: &[S]) -> Result<()> {
    let mut tx = pool.begin().await?;
    let mut applied = 0usize;

    for tag in tags.iter().map(|t| t.as_ref().trim()).filter(|t| !t.is_empty()) {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, tag, weight)
            VALUES (?, ?, 1.0)
            ON CONFLICT(user_id, tag) DO UPDATE SET weight = weight + 1.0
            "#,
        )
        .bind(user_id)
        .bind(tag)
        .execute(&mut *tx)
        .await?;
        applied += 1;
    }

    tx.commit().await?;

    tracing::debug!(user_id, tags = applied, "Reinforced preferences");
    Ok(())
}

/// All preferences of a user, heaviest first
pub async fn list_preferences(pool: &SqlitePool, user_id: i64) -> Result<Vec<UserPreference>> {
    let preferences = sqlx::query_as::<_, UserPreference>(
        r#"
        SELECT id, user_id, tag, weight
        FROM user_preferences
        WHERE user_id = ?
        ORDER BY weight DESC, tag ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(preferences)
}

/// Create or overwrite one preference with an explicit weight
pub async fn set_preference(
    pool: &SqlitePool,
    user_id: i64,
    tag: &str,
    weight: f64,
) -> Result<UserPreference> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(Error::InvalidInput("Preference tag cannot be empty".to_string()));
    }
    if !weight.is_finite() {
        return Err(Error::InvalidInput("Preference weight must be a finite number".to_string()));
    }

    let preference = sqlx::query_as::<_, UserPreference>(
        r#"
        INSERT INTO user_preferences (user_id, tag, weight)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id, tag) DO UPDATE SET weight = excluded.weight
        RETURNING id, user_id, tag, weight
        "#,
    )
    .bind(user_id)
    .bind(tag)
    .bind(weight)
    .fetch_one(pool)
    .await?;

    Ok(preference)
}
