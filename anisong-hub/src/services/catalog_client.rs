//! AnimeThemes catalog client
//!
//! Wraps the read-only AnimeThemes JSON API behind the four query shapes of
//! [`CatalogSource`] and flattens its nested payloads (anime → themes → song →
//! artists, or artist → songs → themes → anime) into [`CandidateRecord`]s.
//!
//! No retries: any transport, status or decode failure is a [`CatalogError`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::models::{CandidateRecord, Season, ThemeType};
use crate::types::{CatalogError, CatalogSource};

const USER_AGENT: &str = "anisong-hub/0.1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const THEME_INCLUDES: &str = "anime,song.artists";
const ANIME_INCLUDES: &str = "animethemes.song.artists";
const ARTIST_INCLUDES: &str = "songs.artists,songs.animethemes.anime";

/// Treat an explicit JSON `null` like a missing list
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /animetheme` response
#[derive(Debug, Default, Deserialize)]
pub struct ThemeListing {
    /// Matching themes, newest anime first
    #[serde(default, deserialize_with = "nullable_vec")]
    pub animethemes: Vec<ThemeEntry>,
}

/// `GET /anime` response
#[derive(Debug, Default, Deserialize)]
pub struct AnimeListing {
    /// Matching anime, each with its themes included
    #[serde(default, deserialize_with = "nullable_vec")]
    pub anime: Vec<AnimeEntry>,
}

/// `GET /artist` response
#[derive(Debug, Default, Deserialize)]
pub struct ArtistListing {
    /// Matching artists, each with their songs included
    #[serde(default, deserialize_with = "nullable_vec")]
    pub artists: Vec<ArtistEntry>,
}

/// One opening, ending or insert song slot of an anime
#[derive(Debug, Default, Deserialize)]
pub struct ThemeEntry {
    /// "OP", "ED" or "IN"
    #[serde(rename = "type", default)]
    pub theme_type: Option<String>,
    /// Parent anime (present when `anime` is included)
    #[serde(default)]
    pub anime: Option<AnimeRef>,
    /// Song used for this slot; absent for unidentified themes
    #[serde(default)]
    pub song: Option<SongEntry>,
}

/// Anime as embedded under a theme
#[derive(Debug, Default, Deserialize)]
pub struct AnimeRef {
    /// Anime title
    #[serde(default)]
    pub name: Option<String>,
    /// Premiere year
    #[serde(default)]
    pub year: Option<u16>,
    /// Premiere season ("Winter", "Spring", "Summer", "Fall")
    #[serde(default)]
    pub season: Option<String>,
}

/// Anime as returned by `/anime`
#[derive(Debug, Default, Deserialize)]
pub struct AnimeEntry {
    /// Anime title
    #[serde(default)]
    pub name: Option<String>,
    /// Premiere year
    #[serde(default)]
    pub year: Option<u16>,
    /// Premiere season
    #[serde(default)]
    pub season: Option<String>,
    /// Themes of this anime, each with song and artists
    #[serde(default, deserialize_with = "nullable_vec")]
    pub animethemes: Vec<ThemeEntry>,
}

/// Song attached to a theme or an artist
#[derive(Debug, Default, Deserialize)]
pub struct SongEntry {
    /// Song title
    #[serde(default)]
    pub title: Option<String>,
    /// Credited performers, in credit order
    #[serde(default, deserialize_with = "nullable_vec")]
    pub artists: Vec<ArtistRef>,
    /// Themes using this song (only under `/artist`)
    #[serde(default, deserialize_with = "nullable_vec")]
    pub animethemes: Vec<ThemeEntry>,
}

/// Performer credit on a song
#[derive(Debug, Default, Deserialize)]
pub struct ArtistRef {
    /// Artist name
    #[serde(default)]
    pub name: Option<String>,
}

/// Artist as returned by `/artist`
#[derive(Debug, Default, Deserialize)]
pub struct ArtistEntry {
    /// Artist name; credited when a song lists no performers
    #[serde(default)]
    pub name: Option<String>,
    /// Songs performed by this artist
    #[serde(default, deserialize_with = "nullable_vec")]
    pub songs: Vec<SongEntry>,
}

fn artist_names(song: Option<&SongEntry>) -> Vec<String> {
    song.map(|s| {
        s.artists
            .iter()
            .filter_map(|a| a.name.clone())
            .filter(|name| !name.trim().is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn song_title(song: Option<&SongEntry>) -> String {
    song.and_then(|s| s.title.clone()).unwrap_or_default()
}

fn theme_type(theme: &ThemeEntry) -> Option<ThemeType> {
    theme.theme_type.as_deref().and_then(ThemeType::from_catalog)
}

fn season(value: Option<&str>) -> Option<Season> {
    value.and_then(Season::parse)
}

/// One record per theme entry of a `/animetheme` listing
pub fn flatten_theme_listing(listing: ThemeListing) -> Vec<CandidateRecord> {
    listing
        .animethemes
        .iter()
        .map(|theme| {
            let anime = theme.anime.as_ref();
            CandidateRecord::new(
                anime.and_then(|a| a.name.clone()).unwrap_or_default(),
                song_title(theme.song.as_ref()),
                artist_names(theme.song.as_ref()),
                theme_type(theme),
            )
            .with_airing(
                anime.and_then(|a| a.year),
                season(anime.and_then(|a| a.season.as_deref())),
            )
        })
        .collect()
}

/// One record per theme of every anime in a `/anime` listing
pub fn expand_anime_listing(listing: AnimeListing) -> Vec<CandidateRecord> {
    let mut records = Vec::new();

    for anime in &listing.anime {
        let anime_name = anime.name.clone().unwrap_or_default();
        let anime_season = season(anime.season.as_deref());

        for theme in &anime.animethemes {
            records.push(
                CandidateRecord::new(
                    anime_name.clone(),
                    song_title(theme.song.as_ref()),
                    artist_names(theme.song.as_ref()),
                    theme_type(theme),
                )
                .with_airing(anime.year, anime_season),
            );
        }
    }

    records
}

/// One record per (song × theme) of every artist in an `/artist` listing
///
/// Year and season come from each theme's parent anime when included. A song
/// without its own artist list is credited to the matched artist.
pub fn expand_artist_listing(listing: ArtistListing) -> Vec<CandidateRecord> {
    let mut records = Vec::new();

    for artist in &listing.artists {
        let fallback_artists: Vec<String> = artist
            .name
            .iter()
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .collect();

        for song in &artist.songs {
            let mut artists = artist_names(Some(song));
            if artists.is_empty() {
                artists = fallback_artists.clone();
            }
            let title = song.title.clone().unwrap_or_default();

            for theme in &song.animethemes {
                let anime = theme.anime.as_ref();
                records.push(
                    CandidateRecord::new(
                        anime.and_then(|a| a.name.clone()).unwrap_or_default(),
                        title.clone(),
                        artists.clone(),
                        theme_type(theme),
                    )
                    .with_airing(
                        anime.and_then(|a| a.year),
                        season(anime.and_then(|a| a.season.as_deref())),
                    ),
                );
            }
        }
    }

    records
}

fn truncated(mut records: Vec<CandidateRecord>, limit: u32) -> Vec<CandidateRecord> {
    records.truncate(limit as usize);
    records
}

/// AnimeThemes API client
pub struct AnimeThemesClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnimeThemesClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, resource);
        tracing::debug!(url = %url, params = ?params, "Querying AnimeThemes API");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for AnimeThemesClient {
    async fn by_theme_type(
        &self,
        theme_type: ThemeType,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError> {
        let listing: ThemeListing = self
            .fetch(
                "animetheme",
                &[
                    ("filter[type]", theme_type.catalog_code().to_string()),
                    ("sort", "-anime.year".to_string()),
                    ("page[size]", limit.to_string()),
                    ("include", THEME_INCLUDES.to_string()),
                ],
            )
            .await?;

        let records = truncated(flatten_theme_listing(listing), limit);
        tracing::info!(theme_type = %theme_type, count = records.len(), "Catalog themes by type");
        Ok(records)
    }

    async fn by_name(&self, text: &str, limit: u32) -> Result<Vec<CandidateRecord>, CatalogError> {
        let listing: AnimeListing = self
            .fetch(
                "anime",
                &[
                    ("q", text.to_string()),
                    ("page[size]", limit.to_string()),
                    ("include", ANIME_INCLUDES.to_string()),
                ],
            )
            .await?;

        let records = truncated(expand_anime_listing(listing), limit);
        tracing::info!(name = %text, count = records.len(), "Catalog themes by anime name");
        Ok(records)
    }

    async fn by_artist(
        &self,
        text: &str,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError> {
        let listing: ArtistListing = self
            .fetch(
                "artist",
                &[
                    ("q", text.to_string()),
                    ("page[size]", limit.to_string()),
                    ("include", ARTIST_INCLUDES.to_string()),
                ],
            )
            .await?;

        let records = truncated(expand_artist_listing(listing), limit);
        tracing::info!(artist = %text, count = records.len(), "Catalog themes by artist");
        Ok(records)
    }

    async fn by_criteria(
        &self,
        year: Option<u16>,
        season: Option<Season>,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, CatalogError> {
        if year.is_none() && season.is_none() {
            return Ok(Vec::new());
        }

        let mut params = vec![
            ("page[size]", limit.to_string()),
            ("include", ANIME_INCLUDES.to_string()),
        ];
        if let Some(year) = year {
            params.push(("filter[year]", year.to_string()));
        }
        if let Some(season) = season {
            params.push(("filter[season]", season.catalog_name().to_string()));
        }

        let listing: AnimeListing = self.fetch("anime", &params).await?;

        let records = truncated(expand_anime_listing(listing), limit);
        tracing::info!(
            year = ?year,
            season = ?season,
            count = records.len(),
            "Catalog themes by airing criteria"
        );
        Ok(records)
    }
}
