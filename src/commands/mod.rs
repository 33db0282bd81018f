pub mod analyze;
pub mod crawl;

pub use analyze::{analyze, AnalyzeArgs};
pub use crawl::{crawl, CrawlArgs};

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use trendscope::analytics::{SentimentPolicy, TrendAccumulator};
use trendscope::config::Config;
use trendscope::ingest::{DocumentSource, IngestStats, Ingestor};
use trendscope::keywords::KeywordMatcher;
use trendscope::nlp::RuleBasedAnalyzer;
use trendscope::report::{export_csv, export_json, ReportRenderer, TrendReport};

/// Flags shared by every analysis command
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Sentiment policy (broadcast, per-document)
    #[arg(long)]
    pub policy: Option<SentimentPolicy>,

    /// Length of the top-N lists
    #[arg(long)]
    pub top: Option<usize>,

    /// Write the ranking table as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the Markdown report to a file instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Custom Handlebars template for the Markdown report
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Style preference (repeatable)
    #[arg(long = "style")]
    pub styles: Vec<String>,

    /// Preferred brand (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<String>,
}

impl OutputArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(policy) = self.policy {
            config.analysis.sentiment_policy = policy;
        }
        if let Some(top) = self.top {
            config.analysis.top_n = top;
        }
        if !self.styles.is_empty() {
            config.preferences.styles = self.styles.clone();
        }
        if !self.brands.is_empty() {
            config.preferences.brands = self.brands.clone();
        }
    }
}

/// Run a source through the built-in analyzer
async fn run_ingestion<S>(
    config: &Config,
    source: &mut S,
    with_delay: bool,
) -> (TrendAccumulator, IngestStats)
where
    S: DocumentSource + ?Sized,
{
    let analyzer = RuleBasedAnalyzer::from_config(&config.analysis);
    let matcher = KeywordMatcher::from_config(&config.keywords);

    let mut ingestor = Ingestor::new(analyzer, matcher)
        .with_policy(config.analysis.sentiment_policy);
    if with_delay {
        ingestor = ingestor.with_delay(config.request_delay());
    }

    let stats = ingestor.run(source).await;
    (ingestor.into_accumulator(), stats)
}

/// Build the report and write every requested output
fn write_outputs(
    config: &Config,
    args: &OutputArgs,
    accumulator: &TrendAccumulator,
    stats: IngestStats,
) -> Result<()> {
    let report = TrendReport::build(accumulator, &config.preferences, config.analysis.top_n)
        .with_stats(stats);

    if let Some(path) = &args.csv {
        export_csv(path, &report.rankings)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    }

    if let Some(path) = &args.json {
        export_json(path, &report)
            .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
    }

    let renderer = match &args.template {
        Some(path) => ReportRenderer::with_template(path)
            .with_context(|| format!("Failed to load template: {}", path.display()))?,
        None => ReportRenderer::new().context("Failed to load report template")?,
    };
    match &args.report {
        Some(path) => renderer
            .save(&report, path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?,
        None => println!("{}", renderer.render(&report)?),
    }

    Ok(())
}
