//! Data models for the aggregation core

pub mod candidate;
pub mod resolved;

pub use candidate::{CandidateRecord, Season, ThemeType};
pub use resolved::{ProviderSelection, ResolvedSong, SearchOutcome, TrackMatch};
