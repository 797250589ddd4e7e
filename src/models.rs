use crate::types::GitHubRepo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository that depends on the tracked library.
///
/// `full_name` (`owner/name`) identifies the record. The timestamps are only
/// known when the record came from the repository API, and are left out of the
/// serialized form otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryRecord {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub url: String,
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<GitHubRepo> for RepositoryRecord {
    fn from(repo: GitHubRepo) -> Self {
        RepositoryRecord {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            stars: repo.stargazers_count,
            url: repo.html_url,
            language: repo.language,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
        }
    }
}

/// Why a paginated fetch loop ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxPagesReached,
    ShortPage,
    NoNextLink,
    EmptyPage,
    FetchFailed,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            StopReason::MaxPagesReached => "maximum page count reached",
            StopReason::ShortPage => "short page",
            StopReason::NoNextLink => "no next page link",
            StopReason::EmptyPage => "empty page",
            StopReason::FetchFailed => "page fetch failed",
        };
        f.write_str(text)
    }
}

/// Result of one collector run, records already sorted by stars.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub records: Vec<RepositoryRecord>,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
    /// Items that were seen but could not be turned into a record.
    pub skipped: usize,
}
