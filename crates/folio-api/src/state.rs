//! Application state shared across all handlers.

use std::sync::Arc;

use folio_cache::CachedUpstream;
use folio_core::config::AppConfig;
use folio_core::traits::Upstream;
use folio_presence::PresenceClient;
use folio_service::{GithubStats, MusicStats, Song, Sources, StarCounts, Weather};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// `/api/projects`
    pub projects: Arc<CachedUpstream<StarCounts>>,
    /// `/api/stats`
    pub github_stats: Arc<CachedUpstream<GithubStats>>,
    /// `/api/music`
    pub music_stats: Arc<CachedUpstream<MusicStats>>,
    /// `/api/weather`
    pub weather: Arc<CachedUpstream<Weather>>,
    /// `/api/songs`, read on every request
    pub songs: Arc<dyn Upstream<Output = Vec<Song>>>,
    /// Live presence feed; `None` when disabled
    pub presence: Option<PresenceClient>,
}

impl AppState {
    /// Wrap the sources in their route caches.
    pub fn new(config: Arc<AppConfig>, sources: Sources, presence: Option<PresenceClient>) -> Self {
        let windows = &config.cache;
        Self {
            projects: Arc::new(CachedUpstream::new(sources.projects, windows.projects_window())),
            github_stats: Arc::new(CachedUpstream::new(
                sources.github_stats,
                windows.github_stats_window(),
            )),
            music_stats: Arc::new(CachedUpstream::new(
                sources.music_stats,
                windows.music_stats_window(),
            )),
            weather: Arc::new(CachedUpstream::new(sources.weather, windows.weather_window())),
            songs: sources.songs,
            presence,
            config,
        }
    }
}
