use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use trendscope::config::Config;
use trendscope::ingest::DirectorySource;
use trendscope::parser::ArticleParser;

use super::{run_ingestion, write_outputs, OutputArgs};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// A .txt/.html file or a directory of them
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn analyze(mut config: Config, args: AnalyzeArgs) -> Result<()> {
    args.output.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let parser = ArticleParser::from_config(&config.crawler).context("Invalid selectors")?;
    let mut source = DirectorySource::open(&args.input, parser)
        .await
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let (accumulator, stats) = run_ingestion(&config, &mut source, false).await;

    eprintln!(
        "Analyzed {} of {} documents ({} skipped)",
        stats.processed, stats.seen, stats.failed
    );

    write_outputs(&config, &args.output, &accumulator, stats)
}
