//! HTTP API for anisong-hub
//!
//! Thin handlers over the aggregator and persistence layer.

pub mod anisong;
pub mod health;
pub mod history;
pub mod identity;
pub mod preferences;
pub mod songs;

pub use anisong::anisong_routes;
pub use health::health_routes;
pub use history::history_routes;
pub use identity::{UserId, USER_ID_HEADER};
pub use preferences::preference_routes;
pub use songs::song_routes;

/// Upper bound on any client-supplied result limit
pub const MAX_LIMIT: u32 = 50;

/// Client limit clamped to 1..=MAX_LIMIT, or the default
pub fn effective_limit(requested: Option<u32>, default: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, MAX_LIMIT)
}
