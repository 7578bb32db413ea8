//! Dual-provider enrichment of one candidate
//!
//! Video and track lookups run as two spawned tasks joined together. Each
//! outcome settles independently: an error, a panic or an empty answer all
//! become "no link" for that provider only, so a resolution never fails.
//! A provider left out of the [`ProviderSelection`] is not consulted at all.

use std::sync::Arc;
use tokio::task::JoinError;

use crate::models::{CandidateRecord, ProviderSelection, ResolvedSong, TrackMatch};
use crate::types::{ProviderError, TrackSearch, VideoSearch};

/// Enriches candidates with video and track links
#[derive(Clone)]
pub struct Resolver {
    video: Arc<dyn VideoSearch>,
    track: Arc<dyn TrackSearch>,
}

impl Resolver {
    pub fn new(video: Arc<dyn VideoSearch>, track: Arc<dyn TrackSearch>) -> Self {
        Self { video, track }
    }

    pub async fn resolve(&self, candidate: CandidateRecord) -> ResolvedSong {
        self.resolve_with(candidate, ProviderSelection::Both).await
    }

    /// Resolve consulting only the selected providers
    pub async fn resolve_with(
        &self,
        candidate: CandidateRecord,
        providers: ProviderSelection,
    ) -> ResolvedSong {
        let video_task = providers.includes_video().then(|| {
            let video = Arc::clone(&self.video);
            let query = candidate.search_query();
            tokio::spawn(async move { video.search_video(&query).await })
        });

        let track_task = providers.includes_track().then(|| {
            let track = Arc::clone(&self.track);
            let title = candidate.song_title.clone();
            let artist = candidate.primary_artist().map(str::to_string);
            let anime = Some(candidate.anime.clone()).filter(|a| !a.trim().is_empty());
            tokio::spawn(async move {
                track
                    .search_track(&title, artist.as_deref(), anime.as_deref())
                    .await
            })
        });

        let (video_outcome, track_outcome) = tokio::join!(
            async {
                match video_task {
                    Some(task) => Some(task.await),
                    None => None,
                }
            },
            async {
                match track_task {
                    Some(task) => Some(task.await),
                    None => None,
                }
            }
        );

        let youtube_url: Option<String> =
            video_outcome.and_then(|outcome| settle("YouTube", &candidate, outcome));
        let track_match: Option<TrackMatch> =
            track_outcome.and_then(|outcome| settle("Spotify", &candidate, outcome));

        tracing::info!(
            song = %candidate.song_title,
            anime = %candidate.anime,
            providers = ?providers,
            youtube = youtube_url.is_some(),
            spotify = track_match.is_some(),
            "Resolved candidate"
        );

        ResolvedSong::new(candidate, youtube_url, track_match)
    }
}

/// Collapse one provider outcome to an optional value
fn settle<T>(
    provider: &str,
    candidate: &CandidateRecord,
    outcome: Result<Result<Option<T>, ProviderError>, JoinError>,
) -> Option<T> {
    match outcome {
        Ok(Ok(value)) => value,
        Ok(Err(ProviderError::NotConfigured(_))) => None,
        Ok(Err(e)) => {
            tracing::warn!(
                provider = provider,
                song = %candidate.song_title,
                error = %e,
                "Provider lookup failed, continuing without link"
            );
            None
        }
        Err(e) => {
            tracing::warn!(
                provider = provider,
                song = %candidate.song_title,
                error = %e,
                "Provider task aborted, continuing without link"
            );
            None
        }
    }
}
