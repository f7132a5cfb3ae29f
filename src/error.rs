use std::path::PathBuf;
use thiserror::Error;

use crate::models::Category;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// A listing page of a category could not be fetched; the category is skipped.
    #[error("category {category} aborted at {url}: {source}")]
    Category {
        category: Category,
        url: String,
        #[source]
        source: Box<ScrapeError>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("cannot read URL list {}: {source}", .path.display())]
    SeedFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("URL list {} contains no URLs", .0.display())]
    EmptySeeds(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::Fetch { source, .. } if source.is_timeout())
    }

    /// Failures contained to one category; the batch moves on.
    pub fn is_category_scoped(&self) -> bool {
        matches!(self, ScrapeError::Category { .. })
    }
}
