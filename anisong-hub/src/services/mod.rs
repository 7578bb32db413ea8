//! Upstream clients and the aggregation core

pub mod aggregator;
pub mod catalog_client;
pub mod resolver;
pub mod spotify_client;
pub mod youtube_client;

pub use aggregator::{Aggregator, QueryShape, TokenInterpretation};
pub use catalog_client::AnimeThemesClient;
pub use resolver::Resolver;
pub use spotify_client::{SpotifyClient, SpotifyCredentials, TokenCache};
pub use youtube_client::YouTubeClient;
