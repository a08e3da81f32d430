//! # Result Writer
//!
//! Appends one record per result to the result sink. The sink is opened in
//! append mode, so earlier runs are never overwritten, and each record is
//! flushed as soon as it is written.

use crate::client::SearchResult;
use crate::error::BotError;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Record layout in the result sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks, one per result, under a per-run header.
    #[default]
    Text,
    /// One JSON object per line.
    Jsonl,
}

pub struct ResultWriter<W: Write> {
    sink: W,
    path: PathBuf,
    format: OutputFormat,
    header_written: bool,
}

impl ResultWriter<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: &Path, format: OutputFormat) -> Result<Self, BotError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| BotError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "result sink opened");
        Ok(Self::new(BufWriter::new(file), path, format))
    }
}

impl<W: Write> ResultWriter<W> {
    /// Wraps an arbitrary sink. `path` is only used in error messages.
    pub fn new(sink: W, path: &Path, format: OutputFormat) -> Self {
        Self {
            sink,
            path: path.to_path_buf(),
            format,
            header_written: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record and flushes it.
    pub fn write(&mut self, result: &SearchResult) -> Result<(), BotError> {
        let record = match self.format {
            OutputFormat::Text => {
                let mut record = String::new();
                if !self.header_written {
                    record.push_str(&format!(
                        "\n# searchbot run {}\n\n",
                        format_timestamp(&result.timestamp)
                    ));
                }
                record.push_str(&format_text(result));
                record
            }
            OutputFormat::Jsonl => {
                let mut line = serde_json::to_string(result).map_err(|e| BotError::Write {
                    path: self.path.clone(),
                    source: std::io::Error::other(e),
                })?;
                line.push('\n');
                line
            }
        };

        self.sink
            .write_all(record.as_bytes())
            .and_then(|()| self.sink.flush())
            .map_err(|source| BotError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.header_written = true;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), BotError> {
        self.sink.flush().map_err(|source| BotError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Collapses runs of whitespace (including newlines) to single spaces.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_text(result: &SearchResult) -> String {
    let mut out = format!(
        "[{}] query: {} | rank: {}\nurl: {}\n",
        format_timestamp(&result.timestamp),
        result.query,
        result.rank,
        result.url
    );
    if let Some(title) = &result.title {
        out.push_str(&format!("title: {}\n", one_line(title)));
    }
    if let Some(snippet) = &result.snippet {
        out.push_str(&format!("snippet: {}\n", one_line(snippet)));
    }
    out.push('\n');
    out
}
