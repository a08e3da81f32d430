//! The batch pipeline: load queries, then for each one pace, search, filter
//! duplicates and append the survivors to the result sink.
//!
//! Per-query search failures are counted and skipped. A missing query source
//! or an unwritable sink ends the run.

use crate::client::{SearchClient, SearchResult};
use crate::config::BotConfig;
use crate::dedup::Deduplicator;
use crate::error::BotError;
use crate::pacing::Pacer;
use crate::query::{self, Query};
use crate::report::{Event, SessionReporter, SessionStats};
use crate::writer::ResultWriter;
use std::io::Write;
use tracing::{debug, info, warn};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Searching,
    Filtering,
    Writing,
    Reporting,
    Done,
    Failed,
}

pub struct SearchBot<C> {
    config: BotConfig,
    client: C,
    pacer: Pacer,
    dedup: Deduplicator,
    reporter: SessionReporter,
    phase: Phase,
}

impl<C: SearchClient> SearchBot<C> {
    /// `pacer` spaces consecutive queries; the first query is not delayed.
    pub fn new(config: BotConfig, client: C, pacer: Pacer) -> Self {
        Self {
            config,
            client,
            pacer,
            dedup: Deduplicator::new(),
            reporter: SessionReporter::new(),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Counters so far. Valid at any point, including after an interrupted run.
    pub fn stats(&self) -> SessionStats {
        self.reporter.summarize()
    }

    /// Runs the whole batch once.
    ///
    /// The result sink is opened only after the queries load, so a failed
    /// load never touches it. The sink is closed when this returns, on every
    /// path, and when the future is dropped.
    pub async fn run(&mut self) -> Result<SessionStats, BotError> {
        if let Err(e) = self.config.validate() {
            return Err(self.fail(e));
        }

        self.enter(Phase::Loading);
        let queries = match query::load(&self.config.queries_path) {
            Ok(queries) => queries,
            Err(e) => return Err(self.fail(e)),
        };

        if queries.is_empty() {
            warn!(
                path = %self.config.queries_path.display(),
                "no queries to process; add one query per line"
            );
        } else {
            let mut writer =
                match ResultWriter::open(&self.config.output_path, self.config.format) {
                    Ok(writer) => writer,
                    Err(e) => return Err(self.fail(e)),
                };
            if let Err(e) = self.run_queries(&queries, &mut writer).await {
                return Err(self.fail(e));
            }
            if let Err(e) = writer.flush() {
                return Err(self.fail(e));
            }
        }

        self.enter(Phase::Reporting);
        let stats = self.stats();
        self.enter(Phase::Done);
        Ok(stats)
    }

    /// Processes `queries` in order against an already-open sink.
    pub async fn run_queries<W: Write>(
        &mut self,
        queries: &[Query],
        writer: &mut ResultWriter<W>,
    ) -> Result<(), BotError> {
        let count = self.config.effective_count();
        info!(
            queries = queries.len(),
            count,
            output = %writer.path().display(),
            "starting batch"
        );

        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                self.pacer.wait().await;
            }
            println!("\n[{}/{}] Searching: '{}'", i + 1, queries.len(), query);
            self.process_query(query, count, writer).await?;
        }
        Ok(())
    }

    async fn process_query<W: Write>(
        &mut self,
        query: &Query,
        count: usize,
        writer: &mut ResultWriter<W>,
    ) -> Result<(), BotError> {
        self.enter(Phase::Searching);
        let written = match self.client.search(query, count).await {
            Ok(results) => self.filter_and_write(results, count, writer)?,
            Err(e) => {
                warn!(query = %query, error = %e, "search failed, moving on");
                self.reporter.record(Event::Error);
                0
            }
        };
        println!("Found {written} new URLs");
        self.reporter.record(Event::QueryProcessed);
        Ok(())
    }

    fn filter_and_write<W: Write>(
        &mut self,
        results: Vec<SearchResult>,
        count: usize,
        writer: &mut ResultWriter<W>,
    ) -> Result<usize, BotError> {
        self.enter(Phase::Filtering);
        let mut written = 0;

        for result in results.into_iter().take(count) {
            self.reporter.record(Event::ResultFound);
            if !self.dedup.is_new(&result.url) {
                debug!(url = %result.url, "duplicate skipped");
                self.reporter.record(Event::DuplicateSkipped);
                continue;
            }

            self.enter(Phase::Writing);
            writer.write(&result)?;
            self.dedup.mark_seen(&result.url);
            self.reporter.record(Event::ResultWritten);
            written += 1;
            println!("  [{}] {}", result.rank, result.url);
        }
        Ok(written)
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }

    fn fail(&mut self, err: BotError) -> BotError {
        self.enter(Phase::Failed);
        err
    }
}
