use thiserror::Error;

#[derive(Error, Debug)]
pub enum DependentsError {
    #[error("GITHUB_TOKEN environment variable is required")]
    MissingToken,

    #[error("API request failed with status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid repository name: {0}")]
    InvalidRepoName(String),

    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, DependentsError>;
