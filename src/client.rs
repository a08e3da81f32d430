//! The Search Client capability.
//!
//! [`SearchClient`] is the seam between the batch pipeline and whatever
//! actually answers queries. [`crate::google::GoogleSearch`] is the real
//! implementation; tests substitute an in-memory one.

use crate::error::SearchError;
use crate::query::Query;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::future::Future;

/// One ranked result returned for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub query: Query,
    /// 1-based position in the engine's result order.
    pub rank: usize,
    pub timestamp: DateTime<Local>,
}

impl SearchResult {
    /// Creates a result stamped with the current local time.
    pub fn new(query: &Query, rank: usize, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            snippet: None,
            query: query.clone(),
            rank,
            timestamp: Local::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// Answers a text query with an ordered list of result URLs.
///
/// Returning an empty list is not an error. Implementations must not return
/// more than `count` results.
pub trait SearchClient: Send + Sync {
    /// Searches for `query`, returning at most `count` results in rank order.
    ///
    /// # Errors
    ///
    /// [`SearchError::RateLimited`] when the engine is throttling us,
    /// [`SearchError::Network`] for transport failures.
    fn search(
        &self,
        query: &Query,
        count: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

impl<T: SearchClient> SearchClient for &T {
    fn search(
        &self,
        query: &Query,
        count: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send {
        (**self).search(query, count)
    }
}
