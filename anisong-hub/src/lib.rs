//! anisong-hub library interface
//!
//! Aggregates anime theme songs from the AnimeThemes catalog, enriches them
//! with YouTube and Spotify links, and keeps per-user history and preference
//! weights in SQLite.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::Aggregator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Search pipeline (catalog, providers, persistence)
    pub aggregator: Arc<Aggregator>,
    /// Result limit applied when a request does not give one
    pub default_limit: u32,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, aggregator: Arc<Aggregator>, default_limit: u32) -> Self {
        Self {
            db,
            aggregator,
            default_limit,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::anisong_routes())
        .merge(api::preference_routes())
        .merge(api::history_routes())
        .merge(api::song_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
