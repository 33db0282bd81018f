//! Presentation of ranked trends
//!
//! Builds a [`TrendReport`] snapshot from an accumulator and the user's
//! preferences, then hands it to the exporters (CSV, JSON) or the Markdown
//! renderer.

pub mod export;
pub mod filters;
pub mod markdown;

pub use export::{export_csv, export_json, write_csv};
pub use filters::{filter_by_styles, recommend_brands, BrandRecommendation};
pub use markdown::ReportRenderer;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::{RankingTable, TrendAccumulator, TrendCategory, TrendRanking};
use crate::config::Preferences;
use crate::ingest::IngestStats;

/// A term and its mention count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Top-N list for one category
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: TrendCategory,
    pub title: &'static str,
    pub distinct: usize,
    pub entries: Vec<TermCount>,
}

/// Everything the presentation layer shows for one run
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub generated_at: DateTime<Utc>,
    pub documents: u64,
    pub categories: Vec<CategorySummary>,
    pub strongest: Vec<TrendRanking>,
    pub rankings: RankingTable,
    pub style_trends: Vec<TrendRanking>,
    pub brand_recommendations: Vec<BrandRecommendation>,
    pub preferences: Preferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<IngestStats>,
}

impl TrendReport {
    /// Build a report from the accumulated state
    ///
    /// `top_n` bounds each category list and the strongest-trends list.
    #[must_use]
    pub fn build(accumulator: &TrendAccumulator, preferences: &Preferences, top_n: usize) -> Self {
        let rankings = RankingTable::from_accumulator(accumulator);

        let categories = TrendCategory::ALL
            .into_iter()
            .map(|category| {
                let counter = accumulator.counter(category);
                CategorySummary {
                    category,
                    title: category_title(category),
                    distinct: counter.len(),
                    entries: counter
                        .most_common(top_n)
                        .into_iter()
                        .map(|(term, count)| TermCount { term, count })
                        .collect(),
                }
            })
            .collect();

        let mut style_trends = filter_by_styles(&rankings.sorted_by_strength(), &preferences.styles);
        style_trends.truncate(filters::PERSONALISED_LIMIT);

        let brand_recommendations =
            recommend_brands(accumulator.brands(), &preferences.brands, top_n);

        Self {
            generated_at: Utc::now(),
            documents: accumulator.document_count(),
            categories,
            strongest: rankings.top(top_n),
            rankings,
            style_trends,
            brand_recommendations,
            preferences: preferences.clone(),
            stats: None,
        }
    }

    /// Attach ingestion stats
    #[must_use]
    pub fn with_stats(mut self, stats: IngestStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Check if the run produced no ranked trends
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    /// Top-N list for one category
    #[must_use]
    pub fn category(&self, category: TrendCategory) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }
}

fn category_title(category: TrendCategory) -> &'static str {
    match category {
        TrendCategory::Brand => "Top Brands",
        TrendCategory::Designer => "Top Designers",
        TrendCategory::Garment => "Popular Garment Types",
        TrendCategory::Theme => "Trending Themes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{DocumentObservation, SentimentPolicy};
    use crate::keywords::KeywordMatcher;
    use crate::nlp::RecognizedEntity;

    fn accumulator() -> TrendAccumulator {
        let matcher = KeywordMatcher::new();
        let mut acc = TrendAccumulator::new();
        for (brand, text, compound) in [
            ("Gucci", "a minimal coat for spring", 0.6),
            ("Zara", "casual jeans", 0.2),
            ("Gucci", "another coat", -0.1),
        ] {
            acc.apply_document(
                &DocumentObservation {
                    entities: vec![RecognizedEntity::organization(brand)],
                    keyword_matches: matcher.find_matches(text),
                    compound,
                },
                SentimentPolicy::PerDocument,
            );
        }
        acc
    }

    #[test]
    fn test_build_report() {
        let prefs = Preferences {
            brands: vec!["Gucci".to_string()],
            ..Preferences::default()
        };
        let report = TrendReport::build(&accumulator(), &prefs, 10);

        assert_eq!(report.documents, 3);
        let brands = report.category(TrendCategory::Brand).unwrap();
        assert_eq!(brands.entries[0], TermCount { term: "gucci".into(), count: 2 });
        assert_eq!(brands.distinct, 2);

        assert_eq!(report.brand_recommendations.len(), 1);
        assert!((report.brand_recommendations[0].relevance - 1.0).abs() < 1e-9);

        assert!(report.strongest.len() <= 10);
        assert!(report
            .strongest
            .windows(2)
            .all(|w| w[0].trend_strength >= w[1].trend_strength));
        assert!(!report.is_empty());
    }

    #[test]
    fn test_top_n_bounds_lists() {
        let report = TrendReport::build(&accumulator(), &Preferences::default(), 1);
        assert!(report.categories.iter().all(|c| c.entries.len() <= 1));
        assert_eq!(report.strongest.len(), 1);
    }

    #[test]
    fn test_empty_report() {
        let report = TrendReport::build(&TrendAccumulator::new(), &Preferences::default(), 10);
        assert!(report.is_empty());
        assert!(report.strongest.is_empty());
        assert!(report.brand_recommendations.is_empty());
        assert_eq!(report.categories.len(), 4);
    }
}
