//! Test Helper Utilities
//!
//! In-memory database plus scripted stand-ins for the catalog and both
//! enrichment providers.

#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anisong_hub::models::{CandidateRecord, Season, ThemeType, TrackMatch};
use anisong_hub::services::{Aggregator, Resolver};
use anisong_hub::types::{CatalogError, CatalogSource, ProviderError, TrackSearch, VideoSearch};

/// Single-connection in-memory database with the full schema
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    anisong_common::db::create_tables(&pool).await.unwrap();
    pool
}

pub fn candidate(anime: &str, title: &str, artist: &str, theme_type: ThemeType) -> CandidateRecord {
    CandidateRecord::new(anime, title, vec![artist.to_string()], Some(theme_type))
}

pub fn guren_no_yumiya() -> CandidateRecord {
    candidate("Attack on Titan", "Guren no Yumiya", "LINKED HORIZON", ThemeType::Op)
}

/// Scripted answer for one catalog call
#[derive(Clone)]
pub enum Answer {
    Records(Vec<CandidateRecord>),
    Unavailable,
}

/// Catalog fake keyed by "shape:argument", recording every call
#[derive(Default)]
pub struct FakeCatalog {
    answers: Mutex<HashMap<String, Answer>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, key: &str, answer: Answer) -> Self {
        self.answers.lock().unwrap().insert(key.to_string(), answer);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, key: String, limit: u32) -> Result<Vec<CandidateRecord>, CatalogError> {
        let answer = self.answers.lock().unwrap().get(&key).cloned();
        self.calls.lock().unwrap().push(key);

        match answer {
            Some(Answer::Records(mut records)) => {
                records.truncate(limit as usize);
                Ok(records)
            }
            Some(Answer::Unavailable) => Err(CatalogError::Api(503, "maintenance".to_string())),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn by_theme_type(
        &self,
        theme_type: ThemeType,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError> {
        self.respond(format!("theme_type:{}", theme_type), limit)
    }

    async fn by_name(&self, text: &str, limit: u32) -> Result<Vec<CandidateRecord>, CatalogError> {
        self.respond(format!("name:{}", text), limit)
    }

    async fn by_artist(
        &self,
        text: &str,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError> {
        self.respond(format!("artist:{}", text), limit)
    }

    async fn by_criteria(
        &self,
        year: Option<u16>,
        season: Option<Season>,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError> {
        let key = match (year, season) {
            (Some(year), _) => format!("criteria:{}", year),
            (None, Some(season)) => format!("criteria:{}", season.catalog_name()),
            (None, None) => "criteria:".to_string(),
        };
        self.respond(key, limit)
    }
}

/// Video provider that always gives the same answer
pub struct FakeVideo(pub Result<Option<String>, ()>);

#[async_trait]
impl VideoSearch for FakeVideo {
    async fn search_video(&self, _query: &str) -> Result<Option<String>, ProviderError> {
        self.0
            .clone()
            .map_err(|_| ProviderError::Network("connection refused".to_string()))
    }
}

/// Track provider that always gives the same answer
pub struct FakeTrack(pub Result<Option<TrackMatch>, ()>);

#[async_trait]
impl TrackSearch for FakeTrack {
    async fn search_track(
        &self,
        _title: &str,
        _artist: Option<&str>,
        _anime: Option<&str>,
    ) -> Result<Option<TrackMatch>, ProviderError> {
        self.0
            .clone()
            .map_err(|_| ProviderError::Api(500, "upstream error".to_string()))
    }
}

pub fn aggregator(
    catalog: Arc<FakeCatalog>,
    video: FakeVideo,
    track: FakeTrack,
    pool: SqlitePool,
) -> Aggregator {
    let resolver = Resolver::new(Arc::new(video), Arc::new(track));
    Aggregator::new(catalog, resolver, pool)
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
