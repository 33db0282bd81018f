//! Markdown report rendering with the Handlebars template engine

use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::{CategorySummary, TrendReport};
use crate::analytics::TrendRanking;
use crate::error::Result;

/// Default report template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.hbs");

const TEMPLATE_NAME: &str = "report";

#[derive(Debug, Serialize)]
struct CountRow {
    rank: usize,
    term: String,
    count: u64,
}

#[derive(Debug, Serialize)]
struct CategoryView {
    title: &'static str,
    distinct: usize,
    rows: Vec<CountRow>,
}

#[derive(Debug, Serialize)]
struct TrendRow {
    rank: usize,
    term: String,
    category: &'static str,
    strength: String,
    frequency: u64,
    sentiment: String,
}

#[derive(Debug, Serialize)]
struct BrandRow {
    brand: String,
    mentions: u64,
    relevance: String,
}

#[derive(Debug, Serialize)]
struct ReportView {
    generated_at: String,
    documents: u64,
    empty: bool,
    categories: Vec<CategoryView>,
    strongest: Vec<TrendRow>,
    style_trends: Vec<TrendRow>,
    brand_recommendations: Vec<BrandRow>,
    styles: String,
    preferred_brands: String,
    budget: String,
    season: String,
    has_stats: bool,
    processed: Option<u64>,
    failed: Option<u64>,
}

fn trend_rows(rankings: &[TrendRanking]) -> Vec<TrendRow> {
    rankings
        .iter()
        .enumerate()
        .map(|(i, r)| TrendRow {
            rank: i + 1,
            term: r.term.clone(),
            category: r.category.as_str(),
            strength: format!("{:.2}", r.trend_strength),
            frequency: r.frequency,
            sentiment: format!("{:.2}", r.average_sentiment),
        })
        .collect()
}

fn category_view(summary: &CategorySummary) -> CategoryView {
    CategoryView {
        title: summary.title,
        distinct: summary.distinct,
        rows: summary
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| CountRow {
                rank: i + 1,
                term: e.term.clone(),
                count: e.count,
            })
            .collect(),
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

impl From<&TrendReport> for ReportView {
    fn from(report: &TrendReport) -> Self {
        Self {
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            documents: report.documents,
            empty: report.is_empty(),
            categories: report.categories.iter().map(category_view).collect(),
            strongest: trend_rows(&report.strongest),
            style_trends: trend_rows(&report.style_trends),
            brand_recommendations: report
                .brand_recommendations
                .iter()
                .map(|b| BrandRow {
                    brand: b.brand.clone(),
                    mentions: b.mentions,
                    relevance: format!("{:.2}%", b.relevance * 100.0),
                })
                .collect(),
            styles: join_or_none(&report.preferences.styles),
            preferred_brands: join_or_none(&report.preferences.brands),
            budget: report.preferences.budget.clone(),
            season: report.preferences.season.clone(),
            has_stats: report.stats.is_some(),
            processed: report.stats.as_ref().map(|s| s.processed),
            failed: report.stats.as_ref().map(|s| s.failed),
        }
    }
}

/// Markdown renderer for [`TrendReport`]
pub struct ReportRenderer<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> ReportRenderer<'a> {
    /// Create a renderer with the built-in template
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Create a renderer with a custom template file
    pub fn with_template(template_path: &Path) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_template_file(TEMPLATE_NAME, template_path)?;
        Ok(Self { handlebars })
    }

    /// Render a report to Markdown
    pub fn render(&self, report: &TrendReport) -> Result<String> {
        let view = ReportView::from(report);
        Ok(self.handlebars.render(TEMPLATE_NAME, &view)?)
    }

    /// Render a report and write it to `path`
    pub fn save(&self, report: &TrendReport, path: &Path) -> Result<()> {
        let markdown = self.render(report)?;
        fs::write(path, markdown)?;
        tracing::info!(path = %path.display(), "Saved Markdown report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{TrendAccumulator, TrendCategory, TrendKey};
    use crate::config::Preferences;
    use crate::ingest::IngestStats;
    use crate::nlp::RecognizedEntity;

    #[test]
    fn test_render_empty_state() {
        let report = TrendReport::build(&TrendAccumulator::new(), &Preferences::default(), 10);
        let markdown = ReportRenderer::new().unwrap().render(&report).unwrap();

        assert!(markdown.contains("# Fashion Trend Analysis"));
        assert!(markdown.contains("No trends were detected"));
        assert!(!markdown.contains("## Strongest Trends"));
    }

    #[test]
    fn test_render_report() {
        let mut acc = TrendAccumulator::new();
        acc.record_entities(&[RecognizedEntity::organization("Dolce & Gabbana")]);
        acc.record_sentiment_observation(TrendKey::new(TrendCategory::Brand, "Dolce & Gabbana"), 0.5);

        let prefs = Preferences {
            brands: vec!["dolce & gabbana".to_string()],
            ..Preferences::default()
        };
        let report = TrendReport::build(&acc, &prefs, 10);
        let markdown = ReportRenderer::new().unwrap().render(&report).unwrap();

        assert!(markdown.contains("## Strongest Trends"));
        assert!(markdown.contains("| 1 | dolce & gabbana | brand | 0.50 | 1 | 0.50 |"));
        assert!(markdown.contains("100.00%"));
        assert!(markdown.contains("Summer 2024"));
    }

    #[test]
    fn test_render_summary_when_every_document_failed() {
        let stats = IngestStats {
            seen: 2,
            processed: 0,
            failed: 2,
            ..IngestStats::default()
        };
        let report = TrendReport::build(&TrendAccumulator::new(), &Preferences::default(), 10)
            .with_stats(stats);
        let markdown = ReportRenderer::new().unwrap().render(&report).unwrap();

        assert!(markdown.contains("(0 processed, 2 skipped)"));
    }

    #[test]
    fn test_render_without_stats_omits_summary() {
        let report = TrendReport::build(&TrendAccumulator::new(), &Preferences::default(), 10);
        let markdown = ReportRenderer::new().unwrap().render(&report).unwrap();

        assert!(!markdown.contains("skipped)"));
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let report = TrendReport::build(&TrendAccumulator::new(), &Preferences::default(), 10);

        ReportRenderer::new().unwrap().save(&report, &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("# Fashion Trend Analysis"));
    }
}
