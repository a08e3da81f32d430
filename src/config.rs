//! Run configuration with compiled-in defaults.
//!
//! Only paths, result count, output format and language are exposed on the
//! command line. Pacing bounds and the result ceiling are fixed here.

use crate::error::BotError;
use crate::writer::OutputFormat;
use std::path::PathBuf;
use std::time::Duration;

/// Default query source file name.
pub const DEFAULT_QUERIES_FILE: &str = "queries.txt";
/// Default result sink file name.
pub const DEFAULT_RESULTS_FILE: &str = "results.txt";
/// Default number of results requested per query.
pub const DEFAULT_NUM_RESULTS: usize = 5;
/// Hard ceiling on results requested per query.
pub const MAX_RESULTS: usize = 50;

/// Configuration for one run.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Line-oriented file of queries.
    pub queries_path: PathBuf,
    /// Append-only result file.
    pub output_path: PathBuf,
    /// Results requested per query, before clamping to `max_results`.
    pub num_results: usize,
    /// Ceiling applied to `num_results`.
    pub max_results: usize,
    /// Random delay `(min, max)` before each query after the first.
    pub query_delay: (Duration, Duration),
    /// Random delay `(min, max)` between result pages of one query.
    pub page_delay: (Duration, Duration),
    /// Interface language passed to the search engine.
    pub lang: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Record layout in the result sink.
    pub format: OutputFormat,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            queries_path: PathBuf::from(DEFAULT_QUERIES_FILE),
            output_path: PathBuf::from(DEFAULT_RESULTS_FILE),
            num_results: DEFAULT_NUM_RESULTS,
            max_results: MAX_RESULTS,
            query_delay: (Duration::from_secs(2), Duration::from_secs(4)),
            page_delay: (Duration::from_millis(500), Duration::from_millis(1500)),
            lang: "en".to_string(),
            timeout_secs: 10,
            format: OutputFormat::Text,
        }
    }
}

impl BotConfig {
    /// Validates this configuration.
    ///
    /// Checks:
    /// - `num_results` and `max_results` must be greater than 0
    /// - `timeout_secs` must be greater than 0
    /// - each delay range must have `min <= max`
    pub fn validate(&self) -> Result<(), BotError> {
        if self.num_results == 0 {
            return Err(BotError::Config(
                "num_results must be greater than 0".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(BotError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(BotError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.query_delay.0 > self.query_delay.1 {
            return Err(BotError::Config(
                "query_delay min must be <= max".into(),
            ));
        }
        if self.page_delay.0 > self.page_delay.1 {
            return Err(BotError::Config("page_delay min must be <= max".into()));
        }
        Ok(())
    }

    /// Number of results actually requested from the Search Client.
    pub fn effective_count(&self) -> usize {
        if self.num_results > self.max_results {
            tracing::warn!(
                requested = self.num_results,
                ceiling = self.max_results,
                "result count clamped to ceiling"
            );
            self.max_results
        } else {
            self.num_results
        }
    }
}
