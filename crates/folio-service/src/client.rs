//! Shared HTTP client for upstream calls.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use folio_core::config::UpstreamConfig;
use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// One `reqwest::Client` (connection pool, timeout, user agent) shared by
/// every source, plus the optional GitHub credential.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    github_token: Option<String>,
}

impl UpstreamClient {
    /// Build the client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            github_token: config.github_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Plain GET.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url)
    }

    /// GET against the GitHub API, authenticated when a token is configured.
    pub fn github(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url).header(ACCEPT, GITHUB_ACCEPT);
        match &self.github_token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Send `request` and decode a 2xx JSON body.
    pub async fn json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> AppResult<T> {
        let response = self.send(request, what).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("{what} returned an unexpected body"),
                e,
            )
        })
    }

    /// Send `request` and read a 2xx text body.
    pub async fn text(&self, request: RequestBuilder, what: &str) -> AppResult<String> {
        let response = self.send(request, what).await?;
        response.text().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, format!("{what} body unreadable"), e)
        })
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> AppResult<Response> {
        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, format!("{what} request failed"), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "{what} returned {}",
                status.as_u16()
            )));
        }
        Ok(response)
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("authenticated", &self.github_token.is_some())
            .finish()
    }
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
