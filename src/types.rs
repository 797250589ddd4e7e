use chrono::{DateTime, Utc};
use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Deserialize)]
pub struct CodeSearchResponse {
    #[serde(default)]
    pub items: Vec<CodeSearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct CodeSearchItem {
    pub repository: CodeSearchRepository,
}

#[derive(Debug, Deserialize)]
pub struct CodeSearchRepository {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
