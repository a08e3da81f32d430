//! # Session Reporter
//!
//! Plain additive counters for one run, printed once at the end.

use serde::Serialize;
use std::fmt;

/// Something worth counting during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    QueryProcessed,
    ResultFound,
    ResultWritten,
    DuplicateSkipped,
    Error,
}

/// Snapshot of the run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub queries_processed: usize,
    pub results_found: usize,
    pub results_written: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
}

#[derive(Debug, Default)]
pub struct SessionReporter {
    stats: SessionStats,
}

impl SessionReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: Event) {
        let counter = match event {
            Event::QueryProcessed => &mut self.stats.queries_processed,
            Event::ResultFound => &mut self.stats.results_found,
            Event::ResultWritten => &mut self.stats.results_written,
            Event::DuplicateSkipped => &mut self.stats.duplicates_skipped,
            Event::Error => &mut self.stats.errors,
        };
        *counter += 1;
    }

    pub fn summarize(&self) -> SessionStats {
        self.stats
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Queries processed:   {}", self.queries_processed)?;
        writeln!(f, "Results found:       {}", self.results_found)?;
        writeln!(f, "Results written:     {}", self.results_written)?;
        writeln!(f, "Duplicates skipped:  {}", self.duplicates_skipped)?;
        write!(f, "Errors encountered:  {}", self.errors)?;
        if self.results_found == 0 {
            write!(f, "\nNo results were found in this run.")?;
        }
        Ok(())
    }
}
