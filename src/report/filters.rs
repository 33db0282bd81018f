//! Preference filters applied at presentation time
//!
//! Nothing here feeds back into the accumulator or the ranker.

use serde::Serialize;

use crate::analytics::{CategoryCounter, TrendRanking};

/// Maximum entries shown by each personalised list
pub const PERSONALISED_LIMIT: usize = 5;

/// A brand mentioned in the run that matches a preferred brand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandRecommendation {
    /// Brand term as counted
    pub brand: String,

    /// Mention count
    pub mentions: u64,

    /// `mentions / number of distinct brands`
    pub relevance: f64,
}

/// Keep rankings whose term contains any of `styles`, case-insensitively
///
/// Input order is preserved. An empty style list keeps nothing.
#[must_use]
pub fn filter_by_styles(rankings: &[TrendRanking], styles: &[String]) -> Vec<TrendRanking> {
    let styles: Vec<String> = styles
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    rankings
        .iter()
        .filter(|r| {
            let term = r.term.to_lowercase();
            styles.iter().any(|s| term.contains(s.as_str()))
        })
        .cloned()
        .collect()
}

/// Recommend preferred brands among the `top_n` most mentioned brands
///
/// A brand qualifies when it equals a preferred brand case-insensitively.
/// At most [`PERSONALISED_LIMIT`] recommendations are returned.
#[must_use]
pub fn recommend_brands(
    brands: &CategoryCounter,
    preferred: &[String],
    top_n: usize,
) -> Vec<BrandRecommendation> {
    let distinct = brands.len();
    if distinct == 0 {
        return Vec::new();
    }

    let preferred: Vec<String> = preferred.iter().map(|p| p.trim().to_lowercase()).collect();

    brands
        .most_common(top_n)
        .into_iter()
        .filter(|(brand, _)| preferred.contains(&brand.to_lowercase()))
        .take(PERSONALISED_LIMIT)
        .map(|(brand, mentions)| BrandRecommendation {
            relevance: mentions as f64 / distinct as f64,
            brand,
            mentions,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::TrendCategory;

    fn ranking(term: &str) -> TrendRanking {
        TrendRanking {
            category: TrendCategory::Garment,
            term: term.to_string(),
            average_sentiment: 0.5,
            frequency: 1,
            trend_strength: 0.5,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_style_filter_substring() {
        let rankings = vec![ranking("minimalist coat"), ranking("streetwear jacket")];
        let kept = filter_by_styles(&rankings, &strings(&["Minimal"]));

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].term, "minimalist coat");
    }

    #[test]
    fn test_empty_styles_keep_nothing() {
        let rankings = vec![ranking("minimalist coat")];
        assert!(filter_by_styles(&rankings, &[]).is_empty());
        assert!(filter_by_styles(&rankings, &strings(&["  "])).is_empty());
    }

    #[test]
    fn test_brand_recommendations() {
        let mut brands = CategoryCounter::default();
        for brand in ["gucci", "gucci", "gucci", "zara", "prada", "dior"] {
            brands.increment(brand.to_string());
        }

        let recs = recommend_brands(&brands, &strings(&["Gucci", "Zara", "Nike"]), 10);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].brand, "gucci");
        assert_eq!(recs[0].mentions, 3);
        assert!((recs[0].relevance - 0.75).abs() < 1e-9);
        assert_eq!(recs[1].brand, "zara");
    }

    #[test]
    fn test_brand_recommendations_respect_top_n() {
        let mut brands = CategoryCounter::default();
        for brand in ["gucci", "gucci", "zara"] {
            brands.increment(brand.to_string());
        }

        let recs = recommend_brands(&brands, &strings(&["zara"]), 1);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_no_brands() {
        let recs = recommend_brands(&CategoryCounter::default(), &strings(&["Gucci"]), 10);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_limit() {
        let mut brands = CategoryCounter::default();
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        for name in names {
            brands.increment(name.to_string());
        }
        let recs = recommend_brands(&brands, &strings(&names), 10);
        assert_eq!(recs.len(), PERSONALISED_LIMIT);
    }
}
