//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `FOLIO_`-prefixed environment variables. Each
//! sub-module represents a logical configuration section. Every field has a
//! default, so the server starts without any configuration file.

pub mod app;
pub mod cache;
pub mod logging;
pub mod presence;
pub mod upstream;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::cache::CacheConfig;
pub use self::logging::LoggingConfig;
pub use self::presence::PresenceConfig;
pub use self::upstream::UpstreamConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Presence gateway settings.
    pub presence: PresenceConfig,
    /// Remote API endpoints and credentials.
    pub upstream: UpstreamConfig,
    /// Per-route cache windows.
    pub cache: CacheConfig,
    /// Projects whose GitHub star counts are served.
    pub projects: Vec<ProjectConfig>,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// A project listed on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Display name.
    pub name: String,
    /// Project URL; GitHub URLs get a star count.
    pub url: String,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// `config/{env}`, and environment variables prefixed with `FOLIO_`
    /// (sections separated by `__`). Missing files are skipped.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        if loaded.projects.is_empty() {
            loaded.projects = default_projects();
        }

        Ok(loaded)
    }
}

fn default_projects() -> Vec<ProjectConfig> {
    vec![
        ProjectConfig {
            name: "Equibop".to_string(),
            url: "https://github.com/Equicord/Equibop".to_string(),
        },
        ProjectConfig {
            name: "VNREZ".to_string(),
            url: "https://github.com/refurbishing/vnrez".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.presence.reconnect_delay_ms, 5000);
        assert_eq!(config.cache.projects_seconds, 30 * 60);
        assert_eq!(config.logging.level, "info");
        assert!(config.upstream.github_token.is_none());
    }

    #[test]
    fn test_overrides_from_source() {
        let config: AppConfig = config::Config::builder()
            .set_override("server.port", 9000)
            .unwrap()
            .set_override("presence.user_id", "42")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.presence.user_id, "42");
        assert_eq!(
            config.presence.gateway_url,
            "wss://api.lanyard.rest/socket"
        );
    }

    #[test]
    fn test_load_falls_back_to_default_projects() {
        let config = AppConfig::load("test-missing-overlay").unwrap();
        assert_eq!(config.projects.len(), 2);
        assert!(config.projects[0].url.contains("github.com"));
    }
}
