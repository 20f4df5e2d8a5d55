//! Contribution calendar and language totals from GitHub.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use folio_core::config::UpstreamConfig;
use folio_core::result::AppResult;
use folio_core::traits::Upstream;

use crate::client::{UpstreamClient, join_url};

/// Payload of `/api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubStats {
    /// Daily contribution entries, passed through as received.
    pub contributions: Value,
    /// Contributions over the last year.
    pub total: u64,
    /// Bytes of code per language across the counted repositories.
    pub languages: BTreeMap<String, u64>,
}

#[derive(Deserialize)]
struct ContributionCalendar {
    #[serde(default)]
    contributions: Value,
    total: ContributionTotals,
}

#[derive(Deserialize)]
struct ContributionTotals {
    #[serde(rename = "lastYear", default)]
    last_year: u64,
}

#[derive(Deserialize)]
struct Repository {
    full_name: String,
    #[serde(default)]
    fork: bool,
    languages_url: String,
}

/// Fetches `/api/stats` data for one GitHub user.
#[derive(Debug)]
pub struct GithubStatsSource {
    client: UpstreamClient,
    api_url: String,
    contributions_url: String,
    user: String,
    included_forks: Vec<String>,
}

impl GithubStatsSource {
    pub fn new(client: UpstreamClient, config: &UpstreamConfig) -> Self {
        Self {
            client,
            api_url: config.github_api_url.clone(),
            contributions_url: config.contributions_url.clone(),
            user: config.github_user.clone(),
            included_forks: config.included_forks.clone(),
        }
    }

    fn counts(&self, repo: &Repository) -> bool {
        !repo.fork || self.included_forks.iter().any(|f| f == &repo.full_name)
    }
}

/// Sum bytes per language over several repositories.
pub fn aggregate_languages<I>(per_repo: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = BTreeMap<String, u64>>,
{
    let mut totals = BTreeMap::new();
    for languages in per_repo {
        for (language, bytes) in languages {
            *totals.entry(language).or_insert(0) += bytes;
        }
    }
    totals
}

#[async_trait]
impl Upstream for GithubStatsSource {
    type Output = GithubStats;

    fn name(&self) -> &'static str {
        "github_stats"
    }

    async fn fetch(&self) -> AppResult<GithubStats> {
        let calendar = self.client.json::<ContributionCalendar>(
            self.client
                .get(&join_url(&self.contributions_url, &self.user))
                .query(&[("y", "last")]),
            "Contribution calendar",
        );
        let repos = self.client.json::<Vec<Repository>>(
            self.client
                .github(&join_url(&self.api_url, &format!("users/{}/repos", self.user)))
                .query(&[("per_page", "100")]),
            "GitHub repositories",
        );
        let (calendar, repos) = tokio::try_join!(calendar, repos)?;

        let counted: Vec<&Repository> = repos.iter().filter(|r| self.counts(r)).collect();
        let per_repo = try_join_all(counted.iter().map(|repo| {
            self.client
                .json::<BTreeMap<String, u64>>(self.client.github(&repo.languages_url), "GitHub languages")
        }))
        .await?;

        debug!(
            repos = repos.len(),
            counted = counted.len(),
            total = calendar.total.last_year,
            "Fetched GitHub stats"
        );

        Ok(GithubStats {
            contributions: calendar.contributions,
            total: calendar.total.last_year,
            languages: aggregate_languages(per_repo),
        })
    }
}
