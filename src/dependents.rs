//! Scraper for the server-rendered "dependents" page of a GitHub repository.
//!
//! The selectors below follow the page markup as GitHub renders it today. There
//! is no versioning on that markup, so a redesign upstream shows up here as
//! empty pages rather than as an error.

use crate::error::{DependentsError, Result};
use crate::models::{CollectionReport, RepositoryRecord, StopReason};
use crate::output;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use scraper::{CaseSensitivity, ElementRef, Html, Selector};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

pub const HTML_BASE_URL: &str = "https://github.com";
pub const DEFAULT_OWNER: &str = "wevm";
pub const DEFAULT_REPO: &str = "viem";
pub const DEFAULT_OUTPUT: &str = "./viem_dependents_scraped.json";

pub const MIN_PAGE_DELAY: Duration = Duration::from_millis(2000);
pub const MAX_PAGE_DELAY: Duration = Duration::from_millis(3000);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Parse a star count as rendered on GitHub ("1,234", "1.2k", "3m").
///
/// Anything that does not parse counts as zero.
pub fn parse_star_count(text: &str) -> u64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let scaled = |prefix: &str, factor: f64| -> u64 {
        match prefix.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => (value * factor).round() as u64,
            _ => 0,
        }
    };

    if let Some(index) = cleaned.find('k') {
        scaled(&cleaned[..index], 1_000.0)
    } else if let Some(index) = cleaned.find('m') {
        scaled(&cleaned[..index], 1_000_000.0)
    } else {
        cleaned.parse::<u64>().unwrap_or(0)
    }
}

/// One parsed listing page.
#[derive(Debug)]
pub struct DependentsPage {
    /// One outcome per repository row found on the page.
    pub entries: Vec<Result<RepositoryRecord>>,
    pub next_url: Option<Url>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DependentsError::HtmlParse(format!("{}: {}", css, e)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiled selectors for the dependents listing markup.
pub struct DependentsParser {
    row: Selector,
    repo_link: Selector,
    description: Selector,
    star_icon: Selector,
    language: Selector,
    pagination: Selector,
}

impl DependentsParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            row: selector("#dependents .Box-row")?,
            repo_link: selector(r#"a[data-hovercard-type="repository"]"#)?,
            description: selector("p")?,
            star_icon: selector("svg.octicon-star")?,
            language: selector(r#"span[itemprop="programmingLanguage"]"#)?,
            pagination: selector(
                ".paginate-container a, .paginate-container button, .paginate-container span",
            )?,
        })
    }

    /// Parse one dependents page. `page_url` is used to resolve relative links.
    pub fn parse_page(&self, html: &str, page_url: &Url) -> Result<DependentsPage> {
        let document = Html::parse_document(html);

        let entries = document
            .select(&self.row)
            .map(|row| self.parse_entry(&row, page_url))
            .collect();

        let next_url = self.find_next_url(&document, page_url)?;

        Ok(DependentsPage { entries, next_url })
    }

    fn parse_entry(&self, row: &ElementRef<'_>, page_url: &Url) -> Result<RepositoryRecord> {
        let link = row
            .select(&self.repo_link)
            .next()
            .ok_or_else(|| DependentsError::HtmlParse("entry has no repository link".to_string()))?;
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| DependentsError::HtmlParse("repository link has no href".to_string()))?;

        let mut url = page_url.join(href)?;
        url.set_query(None);
        url.set_fragment(None);

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        let (owner, name) = match segments.as_slice() {
            [owner, name] => (owner.to_string(), name.to_string()),
            _ => return Err(DependentsError::InvalidRepoName(href.to_string())),
        };

        let description = row
            .select(&self.description)
            .next()
            .map(|p| element_text(&p))
            .filter(|text| !text.is_empty());

        let stars = row
            .select(&self.star_icon)
            .next()
            .and_then(|icon| icon.parent())
            .and_then(ElementRef::wrap)
            .map(|holder| parse_star_count(&element_text(&holder)))
            .unwrap_or(0);

        let language = row
            .select(&self.language)
            .next()
            .map(|span| element_text(&span))
            .filter(|text| !text.is_empty());

        Ok(RepositoryRecord {
            full_name: format!("{}/{}", owner, name),
            name,
            description,
            stars,
            url: url.to_string(),
            language,
            created_at: None,
            updated_at: None,
        })
    }

    fn find_next_url(&self, document: &Html, page_url: &Url) -> Result<Option<Url>> {
        let Some(control) = document
            .select(&self.pagination)
            .find(|el| element_text(el) == "Next")
        else {
            return Ok(None);
        };

        let element = control.value();
        let disabled = element.name() != "a"
            || element.attr("disabled").is_some()
            || element.attr("aria-disabled") == Some("true")
            || element.has_class("disabled", CaseSensitivity::AsciiCaseInsensitive);
        if disabled {
            return Ok(None);
        }

        match element.attr("href") {
            Some(href) => Ok(Some(page_url.join(href)?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub owner: String,
    pub repo: String,
    pub base_url: String,
    /// `None` follows "Next" links until they run out.
    pub max_pages: Option<u32>,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            base_url: HTML_BASE_URL.to_string(),
            max_pages: None,
            min_delay: MIN_PAGE_DELAY,
            max_delay: MAX_PAGE_DELAY,
        }
    }
}

impl ScraperConfig {
    pub fn start_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}/network/dependents",
            self.base_url.trim_end_matches('/'),
            self.owner,
            self.repo
        ))?;
        url.query_pairs_mut().append_pair("dependent_type", "REPOSITORY");
        Ok(url)
    }

    fn page_delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let range = self.min_delay.as_secs_f64()..self.max_delay.as_secs_f64();
        let secs = rand::thread_rng().gen_range(range);
        Duration::from_secs_f64(secs)
    }
}

pub struct DependentsScraper {
    client: Client,
    parser: DependentsParser,
    config: ScraperConfig,
}

impl DependentsScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            parser: DependentsParser::new()?,
            config,
        })
    }

    async fn fetch_page(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DependentsError::HttpStatus { status, body });
        }
        Ok(response.text().await?)
    }

    /// Follow the listing until it runs out, the page cap is hit, or a fetch fails.
    ///
    /// A failed fetch ends the listing; whatever was gathered so far is kept.
    pub async fn collect(&self) -> Result<CollectionReport> {
        let mut next_url = Some(self.config.start_url()?);
        let mut records = Vec::new();
        let mut pages_fetched = 0;
        let mut skipped = 0;

        let stop_reason = loop {
            let Some(url) = next_url.take() else {
                break StopReason::NoNextLink;
            };
            if self.config.max_pages.is_some_and(|cap| pages_fetched >= cap) {
                break StopReason::MaxPagesReached;
            }
            if pages_fetched > 0 {
                let delay = self.config.page_delay();
                debug!(delay_ms = delay.as_millis() as u64, "Waiting before next page");
                sleep(delay).await;
            }

            let html = match self.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(%url, "Stopping, page fetch failed: {}", e);
                    break StopReason::FetchFailed;
                }
            };
            pages_fetched += 1;

            let page = self.parser.parse_page(&html, &url)?;
            if page.entries.is_empty() {
                info!(page = pages_fetched, "No dependents on page, stopping");
                break StopReason::EmptyPage;
            }

            for entry in page.entries {
                match entry {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        warn!(page = pages_fetched, "Skipping entry: {}", e);
                        skipped += 1;
                    }
                }
            }
            info!(page = pages_fetched, total = records.len(), "Scraped dependents page");

            match page.next_url {
                Some(url) => next_url = Some(url),
                None => break StopReason::NoNextLink,
            }
        };

        output::sort_by_stars(&mut records);

        Ok(CollectionReport {
            records,
            pages_fetched,
            stop_reason,
            skipped,
        })
    }

    pub async fn run_to_file(&self, path: &Path) -> Result<CollectionReport> {
        let report = self.collect().await?;
        output::write_records(path, &report.records)?;
        Ok(report)
    }
}
