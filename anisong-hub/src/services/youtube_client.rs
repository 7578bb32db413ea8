//! YouTube Data API video search client
//!
//! One `search` request per lookup, first result only. A 403 (quota exhausted
//! or key rejected) is reported as "no result".

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::types::{ProviderError, VideoSearch};

pub const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";
const USER_AGENT: &str = "anisong-hub/0.1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Default, Deserialize)]
pub struct YouTubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YouTubeSearchItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YouTubeSearchItem {
    #[serde(default)]
    pub id: YouTubeItemId,
}

#[derive(Debug, Default, Deserialize)]
pub struct YouTubeItemId {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

impl YouTubeSearchResponse {
    /// Canonical watch URL of the first item carrying a video id
    pub fn first_watch_url(&self) -> Option<String> {
        self.items
            .iter()
            .find_map(|item| item.id.video_id.as_deref())
            .map(|video_id| format!("{}{}", WATCH_URL_PREFIX, video_id))
    }
}

/// YouTube search client
pub struct YouTubeClient {
    http_client: reqwest::Client,
    search_url: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Result<Self, ProviderError> {
        Self::with_endpoint(YOUTUBE_SEARCH_URL, api_key)
    }

    /// Client against a non-default search endpoint
    pub fn with_endpoint(
        search_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            search_url: search_url.into(),
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_video(&self, query: &str) -> Result<Option<String>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("YouTube"))?;

        tracing::debug!(query = %query, "Querying YouTube search");

        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("maxResults", "1"),
                ("type", "video"),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!(query = %query, "YouTube search forbidden (quota exhausted?)");
            return Ok(None);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), error_text));
        }

        let body: YouTubeSearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let url = body.first_watch_url();
        tracing::debug!(query = %query, url = ?url, "YouTube search finished");
        Ok(url)
    }
}
