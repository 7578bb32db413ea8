//! Stored song lookup
//!
//! History entries carry only a `song_id`; `GET /songs/:id` turns one back into
//! the stored row.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::db::{songs, StoredSong};
use crate::{ApiResult, AppState};

/// GET /songs/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<StoredSong>> {
    Ok(Json(songs::load_song(&state.db, id).await?))
}

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new().route("/songs/:id", get(get_song))
}
