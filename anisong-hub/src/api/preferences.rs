//! Preference endpoints
//!
//! - `GET /preferences`: caller's tag weights, heaviest first
//! - `POST /preferences`: set one tag's weight explicitly
//! - `POST /preferences/reinforce`: add 1 to each listed tag

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::UserId;
use crate::db::{preferences, UserPreference};
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SetPreferenceRequest {
    pub tag: String,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct ReinforceRequest {
    pub tags: Vec<String>,
}

/// GET /preferences
pub async fn list_preferences(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> ApiResult<Json<Vec<UserPreference>>> {
    Ok(Json(preferences::list_preferences(&state.db, user_id).await?))
}

/// POST /preferences
pub async fn set_preference(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<SetPreferenceRequest>,
) -> ApiResult<(StatusCode, Json<UserPreference>)> {
    let preference =
        preferences::set_preference(&state.db, user_id, &payload.tag, payload.weight).await?;
    Ok((StatusCode::CREATED, Json(preference)))
}

/// POST /preferences/reinforce
pub async fn reinforce(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(payload): Json<ReinforceRequest>,
) -> ApiResult<StatusCode> {
    preferences::reinforce(&state.db, user_id, &payload.tags).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build preference routes
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route("/preferences", get(list_preferences).post(set_preference))
        .route("/preferences/reinforce", post(reinforce))
}
