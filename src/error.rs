//! Error types for searchbot.
//!
//! Two families: [`SearchError`] is raised by a single search call and never
//! ends the batch; [`BotError`] ends the run.

use std::path::PathBuf;

/// Failure of one Search Client call. The batch loop records it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The engine refused the request because we are sending too many.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Transport failure or unexpected HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// The response could not be parsed into results.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            SearchError::RateLimited(err.to_string())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

/// Fatal errors. Any of these moves the run to the failed state.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Invalid configuration, reported before any search is made.
    #[error("config error: {0}")]
    Config(String),

    /// The query source does not exist.
    #[error("query source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The query source exists but could not be read.
    #[error("failed to read query source {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The result sink could not be opened or appended to.
    #[error("failed to write results to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for fallible searchbot operations.
pub type Result<T> = std::result::Result<T, BotError>;
