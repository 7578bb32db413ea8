//! Seam traits and error types for the aggregation core
//!
//! The aggregator and resolver only see these traits, so tests (and any
//! alternative upstream) can stand in for the HTTP clients.
//!
//! - [`CatalogSource`]: four catalog query shapes
//! - [`VideoSearch`]: video link lookup
//! - [`TrackSearch`]: track link lookup

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CandidateRecord, Season, ThemeType, TrackMatch};

/// Catalog failures ("catalog unavailable")
///
/// Callers treat every variant the same way: the query shape produced nothing.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: network error: {0}")]
    Network(String),

    #[error("Catalog unavailable: API error {0}: {1}")]
    Api(u16, String),

    #[error("Catalog unavailable: parse error: {0}")]
    Parse(String),
}

/// Enrichment provider failures
///
/// A forbidden / quota-exhausted response is not an error: providers report it
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("{0} credentials not configured")]
    NotConfigured(&'static str),
}

/// Theme-song catalog
///
/// Every method returns at most `limit` records and never fails for missing
/// optional upstream fields.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Themes of one type, newest anime first, one record per theme
    async fn by_theme_type(
        &self,
        theme_type: ThemeType,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError>;

    /// Every theme of every anime matching `text`
    async fn by_name(&self, text: &str, limit: u32) -> Result<Vec<CandidateRecord>, CatalogError>;

    /// Every (song × theme) pair of every artist matching `text`
    async fn by_artist(&self, text: &str, limit: u32)
        -> Result<Vec<CandidateRecord>, CatalogError>;

    /// Every theme of anime airing in `year` and/or `season`
    async fn by_criteria(
        &self,
        year: Option<u16>,
        season: Option<Season>,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError>;
}

/// Video search provider
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Watch URL of the first matching video
    async fn search_video(&self, query: &str) -> Result<Option<String>, ProviderError>;
}

/// Track search provider
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Link (and popularity, if known) of the first matching track
    async fn search_track(
        &self,
        title: &str,
        artist: Option<&str>,
        anime: Option<&str>,
    ) -> Result<Option<TrackMatch>, ProviderError>;
}
