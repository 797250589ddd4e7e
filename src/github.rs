use crate::error::{DependentsError, Result};
use crate::types::{CodeSearchResponse, GitHubRepo};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

pub const API_BASE_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
pub const PER_PAGE: u32 = 100;

const TEXT_MATCH_ACCEPT: &str = "application/vnd.github.v3.text-match+json";

pub struct GitHubClient {
    client: Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Client talking to an alternate API root, e.g. a mock server.
    pub fn with_base_url(token: String, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("viem-dependents/0.1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
    }

    /// Send the request; any non-2xx status comes back as `HttpStatus` with its body.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DependentsError::HttpStatus { status, body })
    }

    /// Fetch one page of code search results and return the owning repository
    /// name of every item on it, in response order.
    ///
    /// `query` is the raw query string; it is URL-encoded here.
    pub async fn search_code_page(&self, query: &str, page: u32) -> Result<Vec<String>> {
        let url = format!(
            "{}/search/code?q={}&per_page={}&page={}",
            self.base_url,
            urlencoding::encode(query),
            PER_PAGE,
            page
        );
        debug!(page, %url, "Requesting code search page");

        let request = self
            .authorized(&url)
            .header("Accept", TEXT_MATCH_ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);

        let response = self.send(request).await?;
        let results: CodeSearchResponse = response.json().await?;

        Ok(results
            .items
            .into_iter()
            .map(|item| item.repository.full_name)
            .collect())
    }

    pub async fn get_repository_info(&self, full_name: &str) -> Result<GitHubRepo> {
        let (owner, repo) = split_full_name(full_name)?;
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);
        let response = match self.send(self.authorized(&url)).await {
            Err(DependentsError::HttpStatus { status, .. })
                if status == reqwest::StatusCode::NOT_FOUND =>
            {
                return Err(DependentsError::NotFound(full_name.to_string()));
            }
            other => other?,
        };
        let repo_data: GitHubRepo = response.json().await?;
        Ok(repo_data)
    }
}

/// Split `owner/name` into its two parts.
pub fn split_full_name(full_name: &str) -> Result<(&str, &str)> {
    match full_name.split_once('/') {
        Some((owner, repo))
            if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
        {
            Ok((owner, repo))
        }
        _ => Err(DependentsError::InvalidRepoName(full_name.to_string())),
    }
}
