//! Catalog-sourced candidate records
//!
//! A candidate is the normalized shape every catalog query produces,
//! regardless of which upstream endpoint it came from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Theme kind: opening, ending or insert song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeType {
    #[serde(rename = "OP")]
    Op,
    #[serde(rename = "ED")]
    Ed,
    #[serde(rename = "INS", alias = "IN")]
    Ins,
}

impl ThemeType {
    /// Strict match used for search tokens: exactly "OP", "ED" or "INS"
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "OP" => Some(ThemeType::Op),
            "ED" => Some(ThemeType::Ed),
            "INS" => Some(ThemeType::Ins),
            _ => None,
        }
    }

    /// Lenient match for values coming back from the catalog
    pub fn from_catalog(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OP" => Some(ThemeType::Op),
            "ED" => Some(ThemeType::Ed),
            "IN" | "INS" | "INSERT" => Some(ThemeType::Ins),
            _ => None,
        }
    }

    /// Code understood by the catalog's `filter[type]`
    pub fn catalog_code(&self) -> &'static str {
        match self {
            ThemeType::Op => "OP",
            ThemeType::Ed => "ED",
            ThemeType::Ins => "IN",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeType::Op => "OP",
            ThemeType::Ed => "ED",
            ThemeType::Ins => "INS",
        }
    }
}

impl fmt::Display for ThemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anime broadcast season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Case-insensitive season name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "winter" => Some(Season::Winter),
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" => Some(Season::Fall),
            _ => None,
        }
    }

    /// Capitalized form used by the catalog's `filter[season]`
    pub fn catalog_name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// Normalized catalog entry, not yet enriched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub anime: String,
    pub song_title: String,
    /// Credited artists in catalog order (may be empty)
    pub artists: Vec<String>,
    pub theme_type: Option<ThemeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

impl CandidateRecord {
    pub fn new(
        anime: impl Into<String>,
        song_title: impl Into<String>,
        artists: Vec<String>,
        theme_type: Option<ThemeType>,
    ) -> Self {
        Self {
            anime: anime.into(),
            song_title: song_title.into(),
            artists,
            theme_type,
            year: None,
            season: None,
        }
    }

    pub fn with_airing(mut self, year: Option<u16>, season: Option<Season>) -> Self {
        self.year = year;
        self.season = season;
        self
    }

    pub fn primary_artist(&self) -> Option<&str> {
        self.artists
            .iter()
            .map(|a| a.as_str())
            .find(|a| !a.trim().is_empty())
    }

    /// Artist credit as stored: every artist joined with ", "
    pub fn artist_credit(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Free-text query: title, primary artist, anime
    pub fn search_query(&self) -> String {
        [
            Some(self.song_title.as_str()),
            self.primary_artist(),
            Some(self.anime.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}
