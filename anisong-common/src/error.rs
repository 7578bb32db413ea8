//! Error taxonomy shared by the anisong crates
//!
//! Upstream failures (catalog, providers) never reach this type: they are
//! absorbed where they happen. What remains is storage, configuration and
//! caller mistakes.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// SQLite failure; the only way a search can fail
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure while preparing the database location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or malformed config file
    #[error("Configuration error: {0}")]
    Config(String),

    /// No stored song with this id
    #[error("Song {0} not found")]
    SongNotFound(i64),

    /// Caller-supplied value rejected before touching storage
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
