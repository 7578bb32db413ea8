//! Search aggregation: catalog fallback chain → resolver → persistence
//!
//! For each token the catalog shapes are tried in a fixed order and the first
//! non-empty answer wins:
//!
//! 1. theme type (only for the exact tokens `OP`, `ED`, `INS`)
//! 2. anime name
//! 3. artist
//! 4. airing criteria (4-digit year or season name)
//!
//! A catalog failure counts as an empty answer for that shape. Candidates are
//! then resolved one at a time, stored, logged to history and fed to the
//! preference engine. Deduplication only happens at the song store. A song
//! with a blank title is returned but not persisted.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::{history, preferences, songs};
use crate::models::{
    CandidateRecord, ProviderSelection, ResolvedSong, SearchOutcome, Season, ThemeType,
};
use crate::services::resolver::Resolver;
use crate::types::{CatalogError, CatalogSource};

/// How a search token can be read by the typed catalog shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenInterpretation {
    ThemeType(ThemeType),
    Year(u16),
    Season(Season),
    /// Only free-text shapes apply
    Unparseable,
}

impl TokenInterpretation {
    pub fn classify(token: &str) -> Self {
        if let Some(theme_type) = ThemeType::from_token(token) {
            return TokenInterpretation::ThemeType(theme_type);
        }

        if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(year) = token.parse() {
                return TokenInterpretation::Year(year);
            }
        }

        match Season::parse(token) {
            Some(season) => TokenInterpretation::Season(season),
            None => TokenInterpretation::Unparseable,
        }
    }
}

/// Catalog query shapes, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    ThemeType,
    Name,
    Artist,
    Criteria,
}

impl QueryShape {
    pub const FALLBACK_ORDER: [QueryShape; 4] = [
        QueryShape::ThemeType,
        QueryShape::Name,
        QueryShape::Artist,
        QueryShape::Criteria,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QueryShape::ThemeType => "theme_type",
            QueryShape::Name => "name",
            QueryShape::Artist => "artist",
            QueryShape::Criteria => "criteria",
        }
    }

    /// Run this shape for a token, or `None` when the shape does not apply
    async fn run(
        &self,
        catalog: &dyn CatalogSource,
        token: &str,
        interpretation: TokenInterpretation,
        limit: u32,
    ) -> Option<Result<Vec<CandidateRecord>, CatalogError>> {
        match (self, interpretation) {
            (QueryShape::ThemeType, TokenInterpretation::ThemeType(theme_type)) => {
                Some(catalog.by_theme_type(theme_type, limit).await)
            }
            (QueryShape::ThemeType, _) => None,
            (QueryShape::Name, _) => Some(catalog.by_name(token, limit).await),
            (QueryShape::Artist, _) => Some(catalog.by_artist(token, limit).await),
            (QueryShape::Criteria, TokenInterpretation::Year(year)) => {
                Some(catalog.by_criteria(Some(year), None, limit).await)
            }
            (QueryShape::Criteria, TokenInterpretation::Season(season)) => {
                Some(catalog.by_criteria(None, Some(season), limit).await)
            }
            (QueryShape::Criteria, _) => None,
        }
    }
}

/// Search entry point shared by the HTTP layer
pub struct Aggregator {
    catalog: Arc<dyn CatalogSource>,
    resolver: Resolver,
    db: SqlitePool,
}

impl Aggregator {
    pub fn new(catalog: Arc<dyn CatalogSource>, resolver: Resolver, db: SqlitePool) -> Self {
        Self {
            catalog,
            resolver,
            db,
        }
    }

    /// Walk the fallback chain for one token
    ///
    /// Returns the first non-empty shape's records, or nothing.
    pub async fn candidates_for_token(&self, token: &str, limit: u32) -> Vec<CandidateRecord> {
        let interpretation = TokenInterpretation::classify(token);

        for shape in QueryShape::FALLBACK_ORDER {
            let Some(outcome) = shape
                .run(self.catalog.as_ref(), token, interpretation, limit)
                .await
            else {
                continue;
            };

            match outcome {
                Ok(records) if !records.is_empty() => {
                    tracing::info!(
                        token = %token,
                        shape = shape.name(),
                        count = records.len(),
                        "Catalog shape matched"
                    );
                    return records;
                }
                Ok(_) => {
                    tracing::debug!(token = %token, shape = shape.name(), "Catalog shape empty");
                }
                Err(e) => {
                    tracing::warn!(
                        token = %token,
                        shape = shape.name(),
                        error = %e,
                        "Catalog shape failed, falling back"
                    );
                }
            }
        }

        tracing::info!(token = %token, "No catalog shape matched token");
        Vec::new()
    }

    /// Candidates for all tokens in token order; blank tokens are ignored
    pub async fn collect_candidates<S: AsRef<str>>(
        &self,
        tokens: &[S],
        limit: u32,
    ) -> Vec<CandidateRecord> {
        let mut candidates = Vec::new();

        for token in tokens.iter().map(|t| t.as_ref().trim()).filter(|t| !t.is_empty()) {
            candidates.extend(self.candidates_for_token(token, limit).await);
        }

        candidates
    }

    /// Full search: fallback chain, enrichment, persistence, preference update
    ///
    /// Fails only when the database does.
    pub async fn search_and_resolve<S: AsRef<str>>(
        &self,
        tokens: &[S],
        user_id: i64,
        limit: u32,
    ) -> anisong_common::Result<SearchOutcome> {
        self.search_and_resolve_with(tokens, user_id, limit, ProviderSelection::Both)
            .await
    }

    /// [`Self::search_and_resolve`] consulting only the selected providers
    pub async fn search_and_resolve_with<S: AsRef<str>>(
        &self,
        tokens: &[S],
        user_id: i64,
        limit: u32,
        providers: ProviderSelection,
    ) -> anisong_common::Result<SearchOutcome> {
        let candidates = self.collect_candidates(tokens, limit).await;
        let mut results = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let resolved = self.resolver.resolve_with(candidate, providers).await;
            self.persist(user_id, &resolved).await?;
            results.push(resolved);
        }

        tracing::info!(user_id, count = results.len(), "Search resolved");
        Ok(SearchOutcome::from(results))
    }

    /// Latest themes of one type, resolved but not persisted
    pub async fn resolve_themes(
        &self,
        theme_type: ThemeType,
        limit: u32,
        providers: ProviderSelection,
    ) -> SearchOutcome {
        let candidates = match self.catalog.by_theme_type(theme_type, limit).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(theme_type = %theme_type, error = %e, "Theme listing unavailable");
                Vec::new()
            }
        };

        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            results.push(self.resolver.resolve_with(candidate, providers).await);
        }

        SearchOutcome::from(results)
    }

    /// Song first, then history with the song's id, then preferences
    async fn persist(&self, user_id: i64, resolved: &ResolvedSong) -> anisong_common::Result<()> {
        if !resolved.is_storable() {
            tracing::debug!(
                anime = %resolved.candidate.anime,
                "Theme has no song title, not persisting"
            );
            return Ok(());
        }

        let stored = songs::save_song(&self.db, resolved).await?;
        history::save_history(&self.db, user_id, stored.id, history::DEFAULT_SCORE).await?;
        preferences::reinforce(&self.db, user_id, &resolved.preference_tags()).await?;
        Ok(())
    }
}
