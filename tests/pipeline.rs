//! Integration tests for the batch pipeline.
//!
//! These drive `SearchBot::run` end to end against real files in a temp
//! directory, with a scripted in-memory search client (no network calls).

use searchbot::{
    BotConfig, BotError, OutputFormat, Pacer, Phase, Query, SearchBot, SearchClient, SearchError,
    SearchResult,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Answers from a fixed table and records every call it receives.
#[derive(Default)]
struct ScriptedClient {
    answers: HashMap<String, Vec<String>>,
    failing: Vec<String>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedClient {
    fn answer(mut self, query: &str, urls: &[&str]) -> Self {
        self.answers.insert(
            query.to_string(),
            urls.iter().map(|u| u.to_string()).collect(),
        );
        self
    }

    fn fail_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().expect("lock").clone()
    }
}

impl SearchClient for ScriptedClient {
    async fn search(&self, query: &Query, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.calls
            .lock()
            .expect("lock")
            .push((query.as_str().to_string(), count));

        if self.failing.iter().any(|q| q == query.as_str()) {
            return Err(SearchError::Network("connection reset".into()));
        }

        Ok(self
            .answers
            .get(query.as_str())
            .map(|urls| {
                urls.iter()
                    .take(count)
                    .enumerate()
                    .map(|(i, url)| SearchResult::new(query, i + 1, url.as_str()).with_title("t"))
                    .collect()
            })
            .unwrap_or_default())
    }
}

struct Workspace {
    _dir: tempfile::TempDir,
    queries: PathBuf,
    output: PathBuf,
}

fn workspace(queries: &str) -> Workspace {
    let dir = tempfile::tempdir().expect("tempdir");
    let queries_path = dir.path().join("queries.txt");
    fs::write(&queries_path, queries).expect("write queries");
    Workspace {
        queries: queries_path,
        output: dir.path().join("results.txt"),
        _dir: dir,
    }
}

fn config(ws: &Workspace) -> BotConfig {
    BotConfig {
        queries_path: ws.queries.clone(),
        output_path: ws.output.clone(),
        ..Default::default()
    }
}

fn written_urls(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read results")
        .lines()
        .filter_map(|line| line.strip_prefix("url: "))
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn duplicate_url_across_queries_written_once() {
    let ws = workspace("a\nb\n");
    let client = ScriptedClient::default()
        .answer("a", &["http://x.com"])
        .answer("b", &["http://x.com"]);

    let mut bot = SearchBot::new(config(&ws), client, Pacer::disabled());
    let stats = bot.run().await.expect("run");

    assert_eq!(written_urls(&ws.output), vec!["http://x.com"]);
    assert_eq!(stats.results_found, 2);
    assert_eq!(stats.results_written, 1);
    assert_eq!(stats.duplicates_skipped, 1);
    assert_eq!(bot.phase(), Phase::Done);
}

#[tokio::test]
async fn network_error_on_middle_query_does_not_stop_batch() {
    let ws = workspace("one\ntwo\nthree\n");
    let client = ScriptedClient::default()
        .answer("one", &["https://one.com"])
        .fail_on("two")
        .answer("three", &["https://three.com"]);

    let mut bot = SearchBot::new(config(&ws), client, Pacer::disabled());
    let stats = bot.run().await.expect("run");

    assert_eq!(
        written_urls(&ws.output),
        vec!["https://one.com", "https://three.com"]
    );
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.queries_processed, 3);
}

#[tokio::test]
async fn comments_and_blank_lines_are_not_searched() {
    let ws = workspace("# header\nfirst\n\nsecond\n   # note\nthird\n");
    let client = ScriptedClient::default();
    let mut bot = SearchBot::new(config(&ws), client, Pacer::disabled());
    let stats = bot.run().await.expect("run");

    assert_eq!(stats.queries_processed, 3);
}

#[tokio::test]
async fn queries_are_searched_in_file_order() {
    let ws = workspace("zeta\nalpha\nmu\n");
    let client = ScriptedClient::default();
    let queries = searchbot::query::load(&ws.queries).expect("load");
    let mut writer = searchbot::ResultWriter::new(Vec::new(), &ws.output, OutputFormat::Text);
    let mut bot = SearchBot::new(config(&ws), &client, Pacer::disabled());
    bot.run_queries(&queries, &mut writer).await.expect("run");

    let order: Vec<String> = client.calls().into_iter().map(|(q, _)| q).collect();
    assert_eq!(order, vec!["zeta", "alpha", "mu"]);
}

#[tokio::test]
async fn requested_count_never_exceeds_ceiling() {
    let ws = workspace("q\n");
    let client = ScriptedClient::default();
    let cfg = BotConfig {
        num_results: 500,
        ..config(&ws)
    };
    let queries = searchbot::query::load(&ws.queries).expect("load");
    let mut writer = searchbot::ResultWriter::new(Vec::new(), &ws.output, OutputFormat::Text);
    let mut bot = SearchBot::new(cfg, &client, Pacer::disabled());
    bot.run_queries(&queries, &mut writer).await.expect("run");

    assert_eq!(client.calls(), vec![("q".to_string(), 50)]);
}

#[tokio::test]
async fn missing_query_source_leaves_sink_untouched() {
    let ws = workspace("");
    fs::remove_file(&ws.queries).expect("remove");
    fs::write(&ws.output, "earlier run\n").expect("seed output");

    let mut bot = SearchBot::new(config(&ws), ScriptedClient::default(), Pacer::disabled());
    let err = bot.run().await.unwrap_err();

    assert!(matches!(err, BotError::SourceNotFound(_)));
    assert_eq!(bot.phase(), Phase::Failed);
    assert_eq!(
        fs::read_to_string(&ws.output).expect("read"),
        "earlier run\n"
    );
}

#[tokio::test]
async fn missing_query_source_does_not_create_sink() {
    let ws = workspace("");
    fs::remove_file(&ws.queries).expect("remove");

    let mut bot = SearchBot::new(config(&ws), ScriptedClient::default(), Pacer::disabled());
    assert!(bot.run().await.is_err());
    assert!(!ws.output.exists());
}

#[tokio::test]
async fn unwritable_sink_fails_the_run() {
    let ws = workspace("q\n");
    let cfg = BotConfig {
        output_path: ws.output.join("not-a-dir").join("results.txt"),
        ..config(&ws)
    };
    let client = ScriptedClient::default().answer("q", &["https://q.com"]);

    let mut bot = SearchBot::new(cfg, client, Pacer::disabled());
    let err = bot.run().await.unwrap_err();

    assert!(matches!(err, BotError::Write { .. }));
    assert_eq!(bot.phase(), Phase::Failed);
}

#[tokio::test]
async fn second_run_appends_and_dedup_resets() {
    let ws = workspace("a\n");
    for _ in 0..2 {
        let client = ScriptedClient::default().answer("a", &["https://a.com", "https://b.com"]);
        let mut bot = SearchBot::new(config(&ws), client, Pacer::disabled());
        let stats = bot.run().await.expect("run");
        assert_eq!(stats.results_written, 2);
    }

    let content = fs::read_to_string(&ws.output).expect("read");
    assert_eq!(content.matches("# searchbot run").count(), 2);
    assert_eq!(written_urls(&ws.output).len(), 4);
}

#[tokio::test]
async fn empty_query_source_completes_without_output() {
    let ws = workspace("# nothing yet\n\n");
    let mut bot = SearchBot::new(config(&ws), ScriptedClient::default(), Pacer::disabled());
    let stats = bot.run().await.expect("run");

    assert_eq!(stats.queries_processed, 0);
    assert_eq!(bot.phase(), Phase::Done);
    assert!(!ws.output.exists());
}

#[tokio::test]
async fn jsonl_output_has_one_record_per_result() {
    let ws = workspace("a\n");
    let cfg = BotConfig {
        format: OutputFormat::Jsonl,
        ..config(&ws)
    };
    let client = ScriptedClient::default().answer("a", &["https://a.com", "https://b.com"]);
    let mut bot = SearchBot::new(cfg, client, Pacer::disabled());
    bot.run().await.expect("run");

    let content = fs::read_to_string(&ws.output).expect("read");
    let records: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["query"], "a");
    assert_eq!(records[1]["rank"], 2);
}

#[tokio::test(start_paused = true)]
async fn queries_are_paced_except_the_first() {
    let ws = workspace("a\nb\nc\n");
    let client = ScriptedClient::default();
    let queries = searchbot::query::load(&ws.queries).expect("load");
    let mut writer = searchbot::ResultWriter::new(Vec::new(), &ws.output, OutputFormat::Text);
    let second = Duration::from_secs(1);
    let pacer = Pacer::new(second, second, StdRng::seed_from_u64(11));
    let mut bot = SearchBot::new(config(&ws), &client, pacer);

    let start = tokio::time::Instant::now();
    bot.run_queries(&queries, &mut writer).await.expect("run");

    // Two gaps between three queries; a wait before the first would make it 3s.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
    assert_eq!(client.calls().len(), 3);
}
