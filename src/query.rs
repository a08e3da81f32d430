//! # Query Loader
//!
//! Reads queries from a line-oriented text file. Blank lines and lines whose
//! first non-whitespace character is `#` are skipped; every other line is
//! trimmed and kept, in file order.

use crate::error::BotError;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Marker that starts a comment line in the query source.
pub const COMMENT_MARKER: char = '#';

/// One line of search text: non-empty, trimmed, not a comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Parses a single source line. Returns `None` for blank and comment lines.
    pub fn parse(line: &str) -> Option<Query> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            None
        } else {
            Some(Query(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses every query in `content`, preserving order.
pub fn parse_queries(content: &str) -> Vec<Query> {
    content.lines().filter_map(Query::parse).collect()
}

/// Loads queries from `path`.
///
/// # Errors
///
/// [`BotError::SourceNotFound`] if the file does not exist,
/// [`BotError::SourceRead`] for any other I/O failure.
pub fn load(path: &Path) -> Result<Vec<Query>, BotError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            BotError::SourceNotFound(path.to_path_buf())
        } else {
            BotError::SourceRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let queries = parse_queries(&content);
    tracing::info!(count = queries.len(), path = %path.display(), "loaded queries");
    Ok(queries)
}

const SAMPLE_QUERIES: &str = "\
# searchbot queries file
# Add your search queries here, one per line.
# Lines starting with # are comments and are ignored.

# Example queries:
# rust web scraping tutorial
# machine learning best practices
# REST API design patterns
";

/// Writes a commented sample query file to `path` unless one already exists.
///
/// Returns `true` if a file was created.
pub fn write_sample(path: &Path) -> Result<bool, BotError> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, SAMPLE_QUERIES).map_err(|source| BotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}
