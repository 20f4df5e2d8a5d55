//! Remote API configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoints, identities, and credentials for the upstream services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// GitHub personal access token; requests are anonymous when unset.
    #[serde(default)]
    pub github_token: Option<String>,
    /// GitHub user whose repositories and contributions are shown.
    #[serde(default = "default_github_user")]
    pub github_user: String,
    /// GitHub REST API base URL.
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    /// Contribution calendar API base URL.
    #[serde(default = "default_contributions_url")]
    pub contributions_url: String,
    /// Forked repositories that still count towards language totals.
    #[serde(default = "default_included_forks")]
    pub included_forks: Vec<String>,
    /// stats.fm API base URL.
    #[serde(default = "default_statsfm_api_url")]
    pub statsfm_api_url: String,
    /// stats.fm user id.
    #[serde(default = "default_statsfm_user_id")]
    pub statsfm_user_id: String,
    /// stats.fm aggregation range (`weeks`, `months`, `lifetime`).
    #[serde(default = "default_statsfm_range")]
    pub statsfm_range: String,
    /// wttr.in base URL.
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    /// Location passed to wttr.in.
    #[serde(default = "default_weather_location")]
    pub weather_location: String,
    /// Directory holding the `.mp3` files served by the music player.
    #[serde(default = "default_songs_dir")]
    pub songs_dir: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// `User-Agent` sent with every upstream request (GitHub rejects requests
    /// without one).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl UpstreamConfig {
    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_user: default_github_user(),
            github_api_url: default_github_api_url(),
            contributions_url: default_contributions_url(),
            included_forks: default_included_forks(),
            statsfm_api_url: default_statsfm_api_url(),
            statsfm_user_id: default_statsfm_user_id(),
            statsfm_range: default_statsfm_range(),
            weather_url: default_weather_url(),
            weather_location: default_weather_location(),
            songs_dir: default_songs_dir(),
            request_timeout_seconds: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_github_user() -> String {
    "refurbishing".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_contributions_url() -> String {
    "https://github-contributions-api.jogruber.de/v4".to_string()
}

fn default_included_forks() -> Vec<String> {
    vec!["refurbishing/dots-hyprland".to_string()]
}

fn default_statsfm_api_url() -> String {
    "https://api.stats.fm/api/v1".to_string()
}

fn default_statsfm_user_id() -> String {
    "31mfwctmusrgnxl6tm3t7m2sl6mu".to_string()
}

fn default_statsfm_range() -> String {
    "weeks".to_string()
}

fn default_weather_url() -> String {
    "https://wttr.in".to_string()
}

fn default_weather_location() -> String {
    "Honduras".to_string()
}

fn default_songs_dir() -> String {
    "public/songs".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    concat!("folio/", env!("CARGO_PKG_VERSION")).to_string()
}
