pub mod cli;
pub mod dependents;
pub mod error;
pub mod github;
pub mod models;
pub mod output;
pub mod search;
pub mod types;

pub use error::{DependentsError, Result};
pub use models::{CollectionReport, RepositoryRecord, StopReason};
