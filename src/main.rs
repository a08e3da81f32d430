//! CLI binary for searchbot.

use clap::Parser;
use searchbot::{query, BotConfig, GoogleSearch, OutputFormat, Pacer, SearchBot, SessionStats};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl+C, following the shell convention for SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

/// searchbot: run a file of web searches and collect the result URLs.
#[derive(Parser)]
#[command(name = "searchbot", version, about)]
struct Cli {
    /// Queries file, one query per line.
    #[arg(short, long, default_value = searchbot::config::DEFAULT_QUERIES_FILE)]
    queries: PathBuf,

    /// Results file. Appended to, never overwritten.
    #[arg(short, long, default_value = searchbot::config::DEFAULT_RESULTS_FILE)]
    output: PathBuf,

    /// Results per query (capped at 50).
    #[arg(
        short = 'n',
        long,
        default_value_t = searchbot::config::DEFAULT_NUM_RESULTS as u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    num_results: u32,

    /// Record layout in the results file.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Interface language passed to the search engine.
    #[arg(long, default_value = "en")]
    lang: String,

    /// Write a sample queries file (if none exists) and exit.
    #[arg(long)]
    init: bool,

    /// Log per-result decisions.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> BotConfig {
        BotConfig {
            queries_path: self.queries,
            output_path: self.output,
            num_results: self.num_results as usize,
            format: self.format,
            lang: self.lang,
            ..BotConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "searchbot=debug"
    } else {
        "searchbot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    println!("searchbot v{}", env!("CARGO_PKG_VERSION"));

    if cli.init {
        return init_queries(&cli.queries);
    }

    let config = cli.into_config();
    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        return Ok(ExitCode::FAILURE);
    }

    let client = GoogleSearch::new(&config)?;
    let pacer = Pacer::from_entropy(config.query_delay.0, config.query_delay.1);
    let output_path = config.output_path.clone();
    let mut bot = SearchBot::new(config, client, pacer);

    let outcome = tokio::select! {
        res = bot.run() => Some(res),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(stats)) => {
            print_summary(&stats, &output_path);
            Ok(ExitCode::SUCCESS)
        }
        Some(Err(e)) => {
            eprintln!("error: {e}");
            Ok(ExitCode::FAILURE)
        }
        None => {
            warn!("received Ctrl+C, results file closed");
            print_summary(&bot.stats(), &output_path);
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
    }
}

fn init_queries(path: &Path) -> anyhow::Result<ExitCode> {
    if query::write_sample(path)? {
        println!("Created sample {}; add one query per line and run again", path.display());
    } else {
        println!("{} already exists, leaving it untouched", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(stats: &SessionStats, output: &Path) {
    let rule = "=".repeat(50);
    println!("\n{rule}");
    println!("searchbot session complete");
    println!("{stats}");
    println!("Results saved to:    {}", output.display());
    println!("{rule}");
}
