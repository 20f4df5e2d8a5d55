//! The full set of sources behind the API routes.

use std::sync::Arc;

use tracing::info;

use folio_core::config::AppConfig;
use folio_core::result::AppResult;
use folio_core::traits::Upstream;

use crate::client::UpstreamClient;
use crate::github::{GithubStats, GithubStatsSource};
use crate::music::{MusicStats, MusicStatsSource};
use crate::projects::{ProjectStars, StarCounts};
use crate::songs::{Song, SongLibrary};
use crate::weather::{Weather, WeatherSource};

/// One source per API route, behind the [`Upstream`] trait so tests can
/// substitute their own.
#[derive(Debug, Clone)]
pub struct Sources {
    pub projects: Arc<dyn Upstream<Output = StarCounts>>,
    pub github_stats: Arc<dyn Upstream<Output = GithubStats>>,
    pub music_stats: Arc<dyn Upstream<Output = MusicStats>>,
    pub weather: Arc<dyn Upstream<Output = Weather>>,
    pub songs: Arc<dyn Upstream<Output = Vec<Song>>>,
}

impl Sources {
    /// Build the production sources sharing one HTTP client.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let upstream = &config.upstream;
        let client = UpstreamClient::new(upstream)?;

        info!(
            projects = config.projects.len(),
            github_user = %upstream.github_user,
            authenticated = upstream.github_token.is_some(),
            songs_dir = %upstream.songs_dir,
            "Upstream sources configured"
        );

        Ok(Self {
            projects: Arc::new(ProjectStars::new(client.clone(), upstream, config.projects.clone())),
            github_stats: Arc::new(GithubStatsSource::new(client.clone(), upstream)),
            music_stats: Arc::new(MusicStatsSource::new(client.clone(), upstream)),
            weather: Arc::new(WeatherSource::new(client, upstream)),
            songs: Arc::new(SongLibrary::new(&upstream.songs_dir)),
        })
    }
}
