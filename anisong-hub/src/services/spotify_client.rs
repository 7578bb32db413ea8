//! Spotify Web API track search client
//!
//! Two calls: a client-credentials token exchange (cached in [`TokenCache`])
//! and a track search. The search tries progressively looser query forms and
//! returns the first track of the first form that matches anything. A token
//! rejected mid-search is replaced once; a second rejection ends the lookup.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::models::TrackMatch;
use crate::types::{ProviderError, TrackSearch};

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_SEARCH_URL: &str = "https://api.spotify.com/v1/search";
const USER_AGENT: &str = "anisong-hub/0.1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const SEARCH_LIMIT: &str = "5";
const SEARCH_MARKET: &str = "JP";

/// Tokens are treated as expired this long before Spotify says they are
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Client-credentials pair
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Cached access token with its expiry
#[derive(Debug, Default)]
pub struct TokenCache {
    value: Option<String>,
    expires_at: Option<Instant>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token still valid at `now`
    pub fn get(&self, now: Instant) -> Option<&str> {
        match (&self.value, self.expires_at) {
            (Some(value), Some(expires_at)) if now < expires_at => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn store(&mut self, value: String, expires_in: Duration, now: Instant) {
        self.expires_at = Some(now + expires_in.saturating_sub(TOKEN_REFRESH_MARGIN));
        self.value = Some(value);
    }

    pub fn invalidate(&mut self) {
        self.value = None;
        self.expires_at = None;
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpotifySearchResponse {
    #[serde(default)]
    pub tracks: SpotifyTrackPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpotifyTrackPage {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub external_urls: SpotifyExternalUrls,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpotifyExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

impl SpotifySearchResponse {
    /// First track carrying a Spotify link
    pub fn first_match(&self) -> Option<TrackMatch> {
        self.tracks.items.iter().find_map(|track| {
            track.external_urls.spotify.as_ref().map(|url| TrackMatch {
                url: url.clone(),
                popularity: track.popularity,
            })
        })
    }
}

/// Query forms, strictest first
pub fn search_queries(title: &str, artist: Option<&str>, anime: Option<&str>) -> Vec<String> {
    let artist = artist.map(str::trim).filter(|a| !a.is_empty());
    let anime = anime.map(str::trim).filter(|a| !a.is_empty());
    let mut queries = Vec::with_capacity(3);

    if let Some(artist) = artist {
        queries.push(format!("track:{} artist:{}", title, artist));
    }
    queries.push(format!("track:{}", title));
    if let Some(anime) = anime {
        queries.push(format!("{} {}", title, anime));
    }

    queries
}

/// Spotify search client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    token_url: String,
    search_url: String,
    credentials: Option<SpotifyCredentials>,
    token_cache: Mutex<TokenCache>,
}

impl SpotifyClient {
    pub fn new(credentials: Option<SpotifyCredentials>) -> Result<Self, ProviderError> {
        Self::with_endpoints(SPOTIFY_TOKEN_URL, SPOTIFY_SEARCH_URL, credentials)
    }

    /// Client against non-default token and search endpoints
    pub fn with_endpoints(
        token_url: impl Into<String>,
        search_url: impl Into<String>,
        credentials: Option<SpotifyCredentials>,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            token_url: token_url.into(),
            search_url: search_url.into(),
            credentials,
            token_cache: Mutex::new(TokenCache::new()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Cached token, or a fresh one when expired
    ///
    /// The cache lock is released during the exchange, so callers racing near
    /// expiry may each fetch a token; the last one stored wins.
    async fn access_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.token_cache.lock().await.get(Instant::now()) {
            return Ok(token.to_string());
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ProviderError::NotConfigured("Spotify"))?;

        tracing::debug!("Requesting Spotify access token");

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!("{}: {}", status.as_u16(), error_text)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        self.token_cache.lock().await.store(
            token.access_token.clone(),
            Duration::from_secs(token.expires_in),
            Instant::now(),
        );

        tracing::info!(expires_in = token.expires_in, "Spotify access token refreshed");
        Ok(token.access_token)
    }
}

#[async_trait]
impl TrackSearch for SpotifyClient {
    async fn search_track(
        &self,
        title: &str,
        artist: Option<&str>,
        anime: Option<&str>,
    ) -> Result<Option<TrackMatch>, ProviderError> {
        let mut token = self.access_token().await?;
        let mut token_refreshed = false;
        let mut last_failure = None;
        let mut any_answered = false;

        let queries = search_queries(title, artist, anime);
        let mut forms = queries.iter();
        let mut current = forms.next();

        while let Some(query) = current {
            tracing::debug!(query = %query, "Querying Spotify search");

            let response = self
                .http_client
                .get(&self.search_url)
                .bearer_auth(&token)
                .query(&[
                    ("q", query.as_str()),
                    ("type", "track"),
                    ("limit", SEARCH_LIMIT),
                    ("market", SEARCH_MARKET),
                ])
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;

            let status = response.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!(query = %query, "Spotify search forbidden");
                return Ok(None);
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                // Revoked before expiry: one fresh token, same query form
                self.token_cache.lock().await.invalidate();
                if token_refreshed {
                    return Err(ProviderError::Auth(
                        "Spotify rejected a freshly issued token".to_string(),
                    ));
                }
                tracing::info!("Spotify token rejected, refreshing");
                token = self.access_token().await?;
                token_refreshed = true;
                continue;
            }

            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                tracing::debug!(query = %query, status = status.as_u16(), "Spotify query form failed");
                last_failure = Some(ProviderError::Api(status.as_u16(), error_text));
                current = forms.next();
                continue;
            }

            any_answered = true;
            let body: SpotifySearchResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            if let Some(track) = body.first_match() {
                tracing::debug!(query = %query, url = %track.url, "Spotify search matched");
                return Ok(Some(track));
            }

            current = forms.next();
        }

        match last_failure {
            Some(err) if !any_answered => Err(err),
            _ => Ok(None),
        }
    }
}
