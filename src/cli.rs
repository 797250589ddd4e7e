use crate::dependents::{self, ScraperConfig};
use crate::search::{self, CodeSearchConfig, SearchQuery};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "code-search-collector")]
#[command(about = "Collects repositories depending on viem through GitHub code search")]
#[command(version = "0.1.0")]
pub struct CollectorCli {
    /// GitHub token used for the search and repository APIs
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Text to search for
    #[arg(long, default_value = search::DEFAULT_PHRASE)]
    pub phrase: String,

    /// Only match files with this name
    #[arg(long, default_value = search::DEFAULT_FILENAME)]
    pub filename: String,

    /// Include archived repositories
    #[arg(long)]
    pub include_archived: bool,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = crate::github::API_BASE_URL)]
    pub api_url: String,

    /// Maximum number of search pages (the API stops at 10)
    #[arg(long, default_value_t = search::MAX_PAGES)]
    pub max_pages: u32,

    /// Seconds to wait between search pages
    #[arg(long, default_value_t = search::PAGE_DELAY.as_secs())]
    pub page_delay: u64,

    /// Output file
    #[arg(long, default_value = search::DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

impl CollectorCli {
    pub fn config(&self) -> CodeSearchConfig {
        CodeSearchConfig {
            query: SearchQuery {
                phrase: self.phrase.clone(),
                filename: self.filename.clone(),
                exclude_archived: !self.include_archived,
            },
            api_base_url: self.api_url.clone(),
            max_pages: self.max_pages,
            page_delay: Duration::from_secs(self.page_delay),
        }
    }
}

#[derive(Parser)]
#[command(name = "dependents-scraper")]
#[command(about = "Scrapes the GitHub dependents page of a repository")]
#[command(version = "0.1.0")]
pub struct ScraperCli {
    /// Owner of the repository whose dependents are listed
    #[arg(long, default_value = dependents::DEFAULT_OWNER)]
    pub owner: String,

    /// Repository whose dependents are listed
    #[arg(long, default_value = dependents::DEFAULT_REPO)]
    pub repo: String,

    /// GitHub web base URL
    #[arg(long, env = "GITHUB_WEB_URL", default_value = dependents::HTML_BASE_URL)]
    pub base_url: String,

    /// Stop after this many pages (default: follow every page)
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Output file
    #[arg(long, default_value = dependents::DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

impl ScraperCli {
    pub fn config(&self) -> ScraperConfig {
        ScraperConfig {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            base_url: self.base_url.clone(),
            max_pages: self.max_pages,
            ..ScraperConfig::default()
        }
    }
}
