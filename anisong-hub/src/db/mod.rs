//! Persistence layer
//!
//! Single writer for the `songs`, `user_history` and `user_preferences`
//! tables. Resolver and aggregator never issue SQL themselves.

pub mod history;
pub mod preferences;
pub mod songs;

pub use history::UserHistoryEntry;
pub use preferences::UserPreference;
pub use songs::StoredSong;

pub use anisong_common::db::init_database;
