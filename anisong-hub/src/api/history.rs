//! Listening history endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{effective_limit, UserId};
use crate::db::{history, UserHistoryEntry};
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// GET /history
pub async fn list_history(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<Vec<UserHistoryEntry>>> {
    let limit = effective_limit(params.limit, DEFAULT_HISTORY_LIMIT);
    let entries = history::list_history(&state.db, user_id, limit).await?;
    Ok(Json(entries))
}

/// Build history routes
pub fn history_routes() -> Router<AppState> {
    Router::new().route("/history", get(list_history))
}
