//! Enriched results handed from the resolver to persistence

use serde::{Deserialize, Serialize};

use super::CandidateRecord;

/// Which enrichment providers a lookup consults
///
/// A skipped provider's link is reported as `null`, exactly like a lookup that
/// found nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSelection {
    #[default]
    Both,
    #[serde(rename = "youtube")]
    Video,
    #[serde(rename = "spotify")]
    Track,
}

impl ProviderSelection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "both" => Some(ProviderSelection::Both),
            "youtube" => Some(ProviderSelection::Video),
            "spotify" => Some(ProviderSelection::Track),
            _ => None,
        }
    }

    pub fn includes_video(&self) -> bool {
        matches!(self, ProviderSelection::Both | ProviderSelection::Video)
    }

    pub fn includes_track(&self) -> bool {
        matches!(self, ProviderSelection::Both | ProviderSelection::Track)
    }
}

/// Best track match from the track-search provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    pub url: String,
    pub popularity: Option<u32>,
}

impl TrackMatch {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            popularity: None,
        }
    }
}

/// Candidate plus whatever links the providers found
///
/// Both `youtube_url` and `spotify_url` always serialize, as `null` when the
/// provider produced nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSong {
    #[serde(flatten)]
    pub candidate: CandidateRecord,
    pub youtube_url: Option<String>,
    pub spotify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify_popularity: Option<u32>,
}

impl ResolvedSong {
    pub fn new(
        candidate: CandidateRecord,
        youtube_url: Option<String>,
        track: Option<TrackMatch>,
    ) -> Self {
        let (spotify_url, spotify_popularity) = match track {
            Some(track) => (Some(track.url), track.popularity),
            None => (None, None),
        };

        Self {
            candidate,
            youtube_url,
            spotify_url,
            spotify_popularity,
        }
    }

    /// Whether this song has an identity worth storing
    ///
    /// Themes whose song is missing upstream come through with a blank title;
    /// they are still returned but never share a stored row.
    pub fn is_storable(&self) -> bool {
        !self.candidate.song_title.trim().is_empty()
    }

    /// Preference tags for this song: each artist, then the anime title
    pub fn preference_tags(&self) -> Vec<String> {
        self.candidate
            .artists
            .iter()
            .chain(std::iter::once(&self.candidate.anime))
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Response body for search endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub count: usize,
    pub results: Vec<ResolvedSong>,
}

impl From<Vec<ResolvedSong>> for SearchOutcome {
    fn from(results: Vec<ResolvedSong>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}
