//! # folio-service
//!
//! Upstream data sources behind the Folio API routes. Each source implements
//! [`Upstream`](folio_core::traits::Upstream) and knows nothing about caching;
//! the API layer decides which ones are served through a response cache.

pub mod client;
pub mod github;
pub mod music;
pub mod projects;
pub mod songs;
pub mod sources;
pub mod weather;

pub use client::UpstreamClient;
pub use github::{GithubStats, GithubStatsSource};
pub use music::{MusicStats, MusicStatsSource};
pub use projects::{ProjectStars, StarCounts};
pub use songs::{Song, SongLibrary};
pub use sources::Sources;
pub use weather::{Weather, WeatherSource};
