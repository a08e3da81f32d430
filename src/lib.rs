//! # searchbot
//!
//! Runs a file of search queries through a search engine and appends the
//! result URLs to a file.
//!
//! - Queries come from a plain text file, one per line, `#` for comments
//! - Consecutive queries are spaced by a random delay
//! - A URL is written at most once per run
//! - A failed query is counted and skipped; the batch carries on
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use searchbot::{BotConfig, GoogleSearch, Pacer, SearchBot};
//!
//! let config = BotConfig::default();
//! let client = GoogleSearch::new(&config)?;
//! let pacer = Pacer::from_entropy(config.query_delay.0, config.query_delay.1);
//! let stats = SearchBot::new(config, client, pacer).run().await?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod client;
pub mod config;
pub mod dedup;
pub mod error;
pub mod google;
pub mod pacing;
pub mod query;
pub mod report;
pub mod user_agents;
pub mod writer;

pub use bot::{Phase, SearchBot};
pub use client::{SearchClient, SearchResult};
pub use config::BotConfig;
pub use error::{BotError, Result, SearchError};
pub use google::GoogleSearch;
pub use pacing::Pacer;
pub use query::Query;
pub use report::{SessionStats, SessionReporter};
pub use writer::{OutputFormat, ResultWriter};
