//! Configuration loading and credential resolution
//!
//! Config file resolution order:
//! 1. Command-line argument (highest priority)
//! 2. `ANISONG_CONFIG` environment variable
//! 3. `~/.config/anisong/config.toml` (only if it exists)
//!
//! Individual credentials resolve ENV → TOML.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ANISONG_CONFIG";

pub const YOUTUBE_API_KEY_ENV: &str = "ANISONG_YOUTUBE_API_KEY";
pub const SPOTIFY_CLIENT_ID_ENV: &str = "ANISONG_SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "ANISONG_SPOTIFY_CLIENT_SECRET";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_CATALOG_BASE_URL: &str = "https://api.animethemes.moe";
const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Contents of `config.toml`
///
/// Every field is optional in the file; accessors apply defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// SQLite database file
    pub database_path: Option<PathBuf>,
    /// HTTP listen address, e.g. "127.0.0.1:8000"
    pub bind_address: Option<String>,
    /// Default tracing filter directive (overridden by RUST_LOG)
    pub log_level: Option<String>,
    /// AnimeThemes API root
    pub catalog_base_url: Option<String>,
    pub youtube_api_key: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    /// Default per-shape catalog result limit
    pub search_limit: Option<u32>,
}

impl TomlConfig {
    /// Load configuration following the file resolution order.
    ///
    /// A missing file yields the default configuration; an unreadable or
    /// malformed file is an error.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_path) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                load_toml_config(&path)
            }
            None => {
                info!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn bind_address(&self) -> String {
        self.bind_address
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
    }

    pub fn log_level(&self) -> String {
        self.log_level.clone().unwrap_or_else(|| "info".to_string())
    }

    pub fn catalog_base_url(&self) -> String {
        self.catalog_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string())
    }

    pub fn search_limit(&self) -> u32 {
        self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT).max(1)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }

    pub fn youtube_api_key(&self) -> Option<String> {
        resolve_credential(YOUTUBE_API_KEY_ENV, self.youtube_api_key.as_deref())
    }

    pub fn spotify_client_id(&self) -> Option<String> {
        resolve_credential(SPOTIFY_CLIENT_ID_ENV, self.spotify_client_id.as_deref())
    }

    pub fn spotify_client_secret(&self) -> Option<String> {
        resolve_credential(
            SPOTIFY_CLIENT_SECRET_ENV,
            self.spotify_client_secret.as_deref(),
        )
    }
}

/// Pick the config file to read, if any
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// `~/.config/anisong/config.toml` on Linux, platform equivalent elsewhere
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("anisong").join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("anisong"))
        .unwrap_or_else(|| PathBuf::from("./anisong_data"))
        .join("anisong.db")
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Resolve one credential: environment first, then TOML
///
/// Blank values count as unset.
pub fn resolve_credential(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    match (env_value, toml_value) {
        (Some(env), Some(_)) => {
            warn!("{} set in both environment and TOML. Using environment.", env_var);
            Some(env)
        }
        (Some(env), None) => Some(env),
        (None, Some(toml)) => Some(toml.to_string()),
        (None, None) => None,
    }
}

/// Non-empty, non-whitespace
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
