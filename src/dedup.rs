//! # Deduplicator
//!
//! Tracks URLs already written during the current run. Matching is an exact,
//! case-sensitive comparison of the URL string. Nothing is persisted.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `url` has not been marked seen in this run.
    pub fn is_new(&self, url: &str) -> bool {
        !self.seen.contains(url)
    }

    pub fn mark_seen(&mut self, url: &str) {
        self.seen.insert(url.to_string());
    }
}
