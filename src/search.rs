use crate::error::{DependentsError, Result};
use crate::github::{GitHubClient, API_BASE_URL, PER_PAGE};
use crate::models::{CollectionReport, RepositoryRecord, StopReason};
use crate::output;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// The search API never returns more than 1,000 results (10 pages of 100).
pub const MAX_PAGES: u32 = 10;
/// Code search allows 10 requests per minute.
pub const PAGE_DELAY: Duration = Duration::from_secs(7);

pub const DEFAULT_PHRASE: &str = "\"viem\"";
pub const DEFAULT_FILENAME: &str = "package.json";
pub const DEFAULT_OUTPUT: &str = "./viem_repositories.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub phrase: String,
    pub filename: String,
    pub exclude_archived: bool,
}

impl SearchQuery {
    /// Raw (unencoded) query string understood by the code search endpoint.
    pub fn to_query_string(&self) -> String {
        let mut query = format!("{} filename:{}", self.phrase, self.filename);
        if self.exclude_archived {
            query.push_str(" -is:archived");
        }
        query
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            phrase: DEFAULT_PHRASE.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
            exclude_archived: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodeSearchConfig {
    pub query: SearchQuery,
    pub api_base_url: String,
    pub max_pages: u32,
    pub page_delay: Duration,
}

impl Default for CodeSearchConfig {
    fn default() -> Self {
        Self {
            query: SearchQuery::default(),
            api_base_url: API_BASE_URL.to_string(),
            max_pages: MAX_PAGES,
            page_delay: PAGE_DELAY,
        }
    }
}

pub struct CodeSearchCollector {
    client: GitHubClient,
    config: CodeSearchConfig,
}

impl CodeSearchCollector {
    /// Fails with [`DependentsError::MissingToken`] when no usable token is given.
    pub fn new(token: Option<String>, config: CodeSearchConfig) -> Result<Self> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(DependentsError::MissingToken)?;
        let client = GitHubClient::with_base_url(token, &config.api_base_url)?;
        Ok(Self { client, config })
    }

    /// Page through code search and return the distinct repository names found.
    ///
    /// Any failed page aborts the whole search.
    pub async fn collect_repository_names(&self) -> Result<(BTreeSet<String>, u32, StopReason)> {
        let query = self.config.query.to_query_string();
        info!(%query, "Searching code");

        let mut names = BTreeSet::new();
        let mut pages_fetched = 0;
        let mut stop_reason = StopReason::MaxPagesReached;

        for page in 1..=self.config.max_pages {
            if page > 1 {
                sleep(self.config.page_delay).await;
            }

            let page_names = self.client.search_code_page(&query, page).await?;
            pages_fetched += 1;
            let item_count = page_names.len();
            names.extend(page_names);

            info!(
                page,
                items = item_count,
                distinct = names.len(),
                "Fetched code search page"
            );

            if item_count < PER_PAGE as usize {
                stop_reason = StopReason::ShortPage;
                break;
            }
        }

        Ok((names, pages_fetched, stop_reason))
    }

    /// Look up each repository. Failures are logged and the repository is left out.
    pub async fn fetch_details(&self, names: &BTreeSet<String>) -> (Vec<RepositoryRecord>, usize) {
        let mut records = Vec::with_capacity(names.len());
        let mut skipped = 0;

        for (index, full_name) in names.iter().enumerate() {
            match self.client.get_repository_info(full_name).await {
                Ok(repo) => records.push(RepositoryRecord::from(repo)),
                Err(e) => {
                    warn!(repo = %full_name, "Skipping repository: {}", e);
                    skipped += 1;
                }
            }

            let done = index + 1;
            if done % 50 == 0 {
                info!("Fetched details for {}/{} repositories", done, names.len());
            }
        }

        (records, skipped)
    }

    pub async fn collect(&self) -> Result<CollectionReport> {
        let (names, pages_fetched, stop_reason) = self.collect_repository_names().await?;
        info!(
            repositories = names.len(),
            pages = pages_fetched,
            reason = %stop_reason,
            "Code search finished, fetching repository details"
        );

        let (mut records, skipped) = self.fetch_details(&names).await;
        output::sort_by_stars(&mut records);

        Ok(CollectionReport {
            records,
            pages_fetched,
            stop_reason,
            skipped,
        })
    }

    /// Collect and write the records to `path`. Nothing is written if collection fails.
    pub async fn run_to_file(&self, path: &Path) -> Result<CollectionReport> {
        let report = self.collect().await?;
        output::write_records(path, &report.records)?;
        Ok(report)
    }
}
