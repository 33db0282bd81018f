use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendscope::config::Config;

mod commands;

use commands::{AnalyzeArgs, CrawlArgs};

#[derive(Parser)]
#[command(
    name = "trendscope",
    version,
    about = "Fashion news trend analyzer with sentiment-weighted entity and keyword ranking",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the index page and analyze the linked articles
    Crawl(CrawlArgs),

    /// Analyze local .txt/.html documents
    Analyze(AnalyzeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config
        .apply_env()
        .context("Failed to apply environment overrides")?;

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("trendscope starting");

    match cli.command {
        Commands::Crawl(args) => {
            tracing::info!(
                index_url = ?args.index_url,
                max_articles = ?args.max_articles,
                delay_ms = ?args.delay_ms,
                "Starting crawl command"
            );
            commands::crawl(config, args).await?;
        }

        Commands::Analyze(args) => {
            tracing::info!(input = %args.input.display(), "Starting analyze command");
            commands::analyze(config, args).await?;
        }
    }

    tracing::info!("trendscope completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("trendscope=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("trendscope={level},warn")))
            .context("Invalid log level")?
    };

    // Logs go to stderr so the Markdown report can be piped from stdout
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
