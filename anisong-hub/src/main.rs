//! anisong-hub - anime theme-song aggregation service
//!
//! Searches the AnimeThemes catalog, enriches each theme with YouTube and
//! Spotify links, and records per-user history and preferences.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use anisong_common::config::TomlConfig;
use anisong_hub::services::{
    Aggregator, AnimeThemesClient, Resolver, SpotifyClient, SpotifyCredentials, YouTubeClient,
};
use anisong_hub::AppState;

#[derive(Debug, Parser)]
#[command(name = "anisong-hub", version, about = "Anime theme-song aggregation service")]
struct Args {
    /// Path to config.toml
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(long, env = "ANISONG_DATABASE")]
    database: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(long, env = "ANISONG_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting anisong-hub");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let db_path = args.database.unwrap_or_else(|| config.database_path());
    info!("Database: {}", db_path.display());
    let db_pool = anisong_common::db::init_database(&db_path).await?;

    let catalog = AnimeThemesClient::new(config.catalog_base_url())?;

    let youtube = YouTubeClient::new(config.youtube_api_key())?;
    if !youtube.is_configured() {
        warn!("YouTube API key not configured; video links will be empty");
    }

    let spotify_credentials = match (config.spotify_client_id(), config.spotify_client_secret()) {
        (Some(client_id), Some(client_secret)) => Some(SpotifyCredentials {
            client_id,
            client_secret,
        }),
        _ => None,
    };
    let spotify = SpotifyClient::new(spotify_credentials)?;
    if !spotify.is_configured() {
        warn!("Spotify client credentials not configured; track links will be empty");
    }

    let resolver = Resolver::new(Arc::new(youtube), Arc::new(spotify));
    let aggregator = Aggregator::new(Arc::new(catalog), resolver, db_pool.clone());
    let state = AppState::new(db_pool, Arc::new(aggregator), config.search_limit());

    let app = anisong_hub::build_router(state);

    let bind_address = args.bind.unwrap_or_else(|| config.bind_address());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("anisong-hub stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
