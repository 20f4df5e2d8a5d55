//! GitHub star counts for the listed projects.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::debug;

use folio_core::config::{ProjectConfig, UpstreamConfig};
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::Upstream;

use crate::client::{UpstreamClient, join_url};

/// Project URL → stargazer count.
pub type StarCounts = BTreeMap<String, u64>;

#[derive(Deserialize)]
struct RepoInfo {
    stargazers_count: u64,
}

/// Fetches the star count of every GitHub-hosted project.
#[derive(Debug)]
pub struct ProjectStars {
    client: UpstreamClient,
    api_url: String,
    projects: Vec<ProjectConfig>,
}

impl ProjectStars {
    pub fn new(client: UpstreamClient, config: &UpstreamConfig, projects: Vec<ProjectConfig>) -> Self {
        Self {
            client,
            api_url: config.github_api_url.clone(),
            projects,
        }
    }
}

/// Extract `(owner, repo)` from a `github.com/<owner>/<repo>` URL.
pub fn parse_github_repo(url: &str) -> Option<(&str, &str)> {
    const HOST: &str = "github.com/";
    let start = url.find(HOST)? + HOST.len();
    let mut segments = url[start..].split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    Some((owner, repo))
}

#[async_trait]
impl Upstream for ProjectStars {
    type Output = StarCounts;

    fn name(&self) -> &'static str {
        "projects"
    }

    /// Any failing repository fails the whole refresh.
    async fn fetch(&self) -> AppResult<StarCounts> {
        let lookups = self.projects.iter().filter_map(|project| {
            let (owner, repo) = parse_github_repo(&project.url)?;
            let url = join_url(&self.api_url, &format!("repos/{owner}/{repo}"));
            Some(async move {
                let info: RepoInfo = self.client.json(self.client.github(&url), "GitHub repository").await?;
                Ok::<_, AppError>((project.url.clone(), info.stargazers_count))
            })
        });

        let counts: StarCounts = try_join_all(lookups).await?.into_iter().collect();
        debug!(repos = counts.len(), "Fetched project star counts");
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_repo() {
        assert_eq!(
            parse_github_repo("https://github.com/Equicord/Equibop"),
            Some(("Equicord", "Equibop"))
        );
        assert_eq!(
            parse_github_repo("https://github.com/refurbishing/vnrez/tree/main"),
            Some(("refurbishing", "vnrez"))
        );
    }

    #[test]
    fn test_non_github_urls_are_skipped() {
        assert_eq!(parse_github_repo("https://example.com/project"), None);
        assert_eq!(parse_github_repo("https://github.com/refurbishing"), None);
        assert_eq!(parse_github_repo("https://github.com/refurbishing/"), None);
    }
}
