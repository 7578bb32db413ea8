//! Anisong search endpoints
//!
//! - `GET /anisong/search?q=OP,EGOIST&limit=5`: full search for the caller,
//!   persisted to their history and preferences
//! - `GET /anisong/themes?theme_type=OP&limit=5`: latest themes of one type,
//!   resolved but not persisted
//!
//! Both accept `provider=youtube|spotify|both` (default `both`) to limit which
//! enrichment providers are consulted.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{effective_limit, UserId};
use crate::models::{ProviderSelection, SearchOutcome, ThemeType};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Comma-separated search tokens
    pub q: String,
    pub limit: Option<u32>,
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemesParams {
    pub theme_type: String,
    pub limit: Option<u32>,
    pub provider: Option<String>,
}

/// Split `q` into trimmed, non-empty tokens
pub fn parse_tokens(q: &str) -> Vec<String> {
    q.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Provider selection from the `provider` parameter, `Both` when absent
pub fn parse_provider(value: Option<&str>) -> ApiResult<ProviderSelection> {
    match value {
        None => Ok(ProviderSelection::Both),
        Some(value) => ProviderSelection::parse(value).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "provider must be one of youtube, spotify, both (got '{}')",
                value
            ))
        }),
    }
}

/// GET /anisong/search
pub async fn search(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchOutcome>> {
    let tokens = parse_tokens(&params.q);
    if tokens.is_empty() {
        return Err(ApiError::BadRequest("At least one search token is required".to_string()));
    }

    let providers = parse_provider(params.provider.as_deref())?;
    let limit = effective_limit(params.limit, state.default_limit);
    tracing::info!(user_id, tokens = ?tokens, limit, providers = ?providers, "Search request");

    let outcome = state
        .aggregator
        .search_and_resolve_with(&tokens, user_id, limit, providers)
        .await?;

    Ok(Json(outcome))
}

/// GET /anisong/themes
pub async fn themes(
    State(state): State<AppState>,
    Query(params): Query<ThemesParams>,
) -> ApiResult<Json<SearchOutcome>> {
    let theme_type = ThemeType::from_token(params.theme_type.trim()).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "theme_type must be one of OP, ED, INS (got '{}')",
            params.theme_type
        ))
    })?;

    let providers = parse_provider(params.provider.as_deref())?;
    let limit = effective_limit(params.limit, state.default_limit);
    Ok(Json(
        state
            .aggregator
            .resolve_themes(theme_type, limit, providers)
            .await,
    ))
}

/// Build search routes
pub fn anisong_routes() -> Router<AppState> {
    Router::new()
        .route("/anisong/search", get(search))
        .route("/anisong/themes", get(themes))
}
