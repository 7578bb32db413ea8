//! # Anisong Common Library
//!
//! Shared code for the anisong services:
//! - Error type and result alias
//! - Configuration loading (TOML + environment)
//! - SQLite bootstrap for the song, history and preference tables

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
