//! Response cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Freshness windows for the cached API routes, in seconds.
///
/// Within its window a route answers from its last successful payload
/// without contacting the upstream service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// GitHub star counts (`/api/projects`).
    #[serde(default = "default_projects")]
    pub projects_seconds: u64,
    /// GitHub contributions and languages (`/api/stats`).
    #[serde(default = "default_github_stats")]
    pub github_stats_seconds: u64,
    /// stats.fm top artists and tracks (`/api/music`).
    #[serde(default = "default_music_stats")]
    pub music_stats_seconds: u64,
    /// Current weather (`/api/weather`).
    #[serde(default = "default_weather")]
    pub weather_seconds: u64,
}

impl CacheConfig {
    /// Window for `/api/projects`.
    pub fn projects_window(&self) -> Duration {
        Duration::from_secs(self.projects_seconds)
    }

    /// Window for `/api/stats`.
    pub fn github_stats_window(&self) -> Duration {
        Duration::from_secs(self.github_stats_seconds)
    }

    /// Window for `/api/music`.
    pub fn music_stats_window(&self) -> Duration {
        Duration::from_secs(self.music_stats_seconds)
    }

    /// Window for `/api/weather`.
    pub fn weather_window(&self) -> Duration {
        Duration::from_secs(self.weather_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            projects_seconds: default_projects(),
            github_stats_seconds: default_github_stats(),
            music_stats_seconds: default_music_stats(),
            weather_seconds: default_weather(),
        }
    }
}

fn default_projects() -> u64 {
    30 * 60
}

fn default_github_stats() -> u64 {
    2 * 60 * 60
}

fn default_music_stats() -> u64 {
    5 * 60 * 60
}

fn default_weather() -> u64 {
    5 * 60
}
