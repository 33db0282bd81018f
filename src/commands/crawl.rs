use anyhow::{Context, Result};
use clap::Args;

use trendscope::config::Config;
use trendscope::crawler::ArticleCrawler;

use super::{run_ingestion, write_outputs, OutputArgs};

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Index page listing article links
    #[arg(long)]
    pub index_url: Option<String>,

    /// Maximum number of articles to analyze (0 = unlimited)
    #[arg(short, long)]
    pub max_articles: Option<usize>,

    /// Pause between articles in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn crawl(mut config: Config, args: CrawlArgs) -> Result<()> {
    if let Some(url) = args.index_url {
        config.crawler.index_url = url;
    }
    if let Some(max) = args.max_articles {
        config.crawler.max_articles = max;
    }
    if let Some(delay) = args.delay_ms {
        config.crawler.request_delay_ms = delay;
    }
    args.output.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let mut crawler = ArticleCrawler::new(&config.crawler).context("Failed to create crawler")?;

    let discovered = crawler
        .discover()
        .await
        .with_context(|| format!("Failed to fetch index page {}", config.crawler.index_url))?;

    if discovered == 0 {
        tracing::warn!(index = %config.crawler.index_url, "No article links found");
    }

    let (accumulator, stats) = run_ingestion(&config, &mut crawler, true).await;

    eprintln!(
        "Analyzed {} of {} articles ({} skipped)",
        stats.processed, stats.seen, stats.failed
    );

    write_outputs(&config, &args.output, &accumulator, stats)
}
