//! Top artists and tracks from stats.fm.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_core::config::UpstreamConfig;
use folio_core::result::AppResult;
use folio_core::traits::Upstream;

use crate::client::{UpstreamClient, join_url};

/// Payload of `/api/music`; both lists are passed through as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicStats {
    pub artists: Value,
    pub tracks: Value,
}

#[derive(Debug)]
pub struct MusicStatsSource {
    client: UpstreamClient,
    api_url: String,
    user_id: String,
    range: String,
}

impl MusicStatsSource {
    pub fn new(client: UpstreamClient, config: &UpstreamConfig) -> Self {
        Self {
            client,
            api_url: config.statsfm_api_url.clone(),
            user_id: config.statsfm_user_id.clone(),
            range: config.statsfm_range.clone(),
        }
    }

    async fn top(&self, kind: &str) -> AppResult<Value> {
        let url = join_url(&self.api_url, &format!("users/{}/top/{kind}", self.user_id));
        let request = self.client.get(&url).query(&[("range", self.range.as_str())]);
        self.client.json(request, "stats.fm").await
    }
}

#[async_trait]
impl Upstream for MusicStatsSource {
    type Output = MusicStats;

    fn name(&self) -> &'static str {
        "music_stats"
    }

    async fn fetch(&self) -> AppResult<MusicStats> {
        let (artists, tracks) = tokio::try_join!(self.top("artists"), self.top("tracks"))?;
        Ok(MusicStats { artists, tracks })
    }
}
