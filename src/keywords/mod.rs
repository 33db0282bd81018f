//! Domain keyword matching
//!
//! Applies an ordered list of category pattern sets (garment terms,
//! seasonal/theme terms, qualifier terms) to lower-cased document text.
//! Every occurrence is reported, so a term mentioned three times yields three
//! matches. No stemming is applied: "dress" and "dresses" are distinct terms.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::KeywordConfig;

/// Default garment-type terms
pub const GARMENT_TERMS: &[&str] = &[
    "dress",
    "gown",
    "suit",
    "jacket",
    "coat",
    "skirt",
    "pants",
    "jeans",
    "shirt",
    "blouse",
    "sweater",
    "accessory",
];

/// Default seasonal/theme terms
pub const THEME_TERMS: &[&str] = &["spring", "summer", "fall", "winter", "seasonal", "trend"];

/// Default qualifier terms
pub const QUALIFIER_TERMS: &[&str] = &["luxury", "high-end", "affordable", "sustainable", "ethical"];

/// Category a keyword pattern set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCategory {
    /// Garment types (dress, gown, ...)
    Garment,

    /// Seasons and themes (spring, trend, ...)
    Theme,

    /// Price/ethics qualifiers; matched but routed to no counter
    Qualifier,
}

impl KeywordCategory {
    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Garment => "garment",
            Self::Theme => "theme",
            Self::Qualifier => "qualifier",
        }
    }
}

/// A single keyword occurrence in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Matched term, lower-cased
    pub term: String,

    /// Category of the pattern set that produced the match
    pub category: KeywordCategory,

    /// Byte offset of the match in the lower-cased text
    pub start: usize,

    /// Byte offset just past the match in the lower-cased text
    pub end: usize,
}

/// Compiled pattern for one category
#[derive(Debug, Clone)]
struct PatternSet {
    category: KeywordCategory,
    pattern: Regex,
}

/// Matches domain keywords against document text
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    sets: Vec<PatternSet>,
}

impl KeywordMatcher {
    /// Create a matcher with the default fashion term lists
    #[must_use]
    pub fn new() -> Self {
        let sets = [
            (KeywordCategory::Garment, GARMENT_TERMS),
            (KeywordCategory::Theme, THEME_TERMS),
            (KeywordCategory::Qualifier, QUALIFIER_TERMS),
        ];

        let sets = sets
            .iter()
            .filter_map(|(category, terms)| {
                Self::compile(terms.iter().copied()).map(|pattern| PatternSet {
                    category: *category,
                    pattern,
                })
            })
            .collect();

        Self { sets }
    }

    /// Create a matcher from configured term lists
    ///
    /// Categories are applied in the order garments, themes, qualifiers.
    /// An empty term list disables that category.
    #[must_use]
    pub fn from_config(config: &KeywordConfig) -> Self {
        Self::with_terms(&[
            (KeywordCategory::Garment, &config.garments),
            (KeywordCategory::Theme, &config.themes),
            (KeywordCategory::Qualifier, &config.qualifiers),
        ])
    }

    /// Create a matcher from an ordered list of (category, terms) pairs
    #[must_use]
    pub fn with_terms(sets: &[(KeywordCategory, &Vec<String>)]) -> Self {
        let sets = sets
            .iter()
            .filter_map(|(category, terms)| {
                Self::compile(terms.iter().map(String::as_str)).map(|pattern| PatternSet {
                    category: *category,
                    pattern,
                })
            })
            .collect();

        Self { sets }
    }

    /// Build a word-boundary alternation from literal terms
    ///
    /// Terms are escaped, so `high-end` matches literally.
    fn compile<'a>(terms: impl Iterator<Item = &'a str>) -> Option<Regex> {
        let alternatives: Vec<String> = terms
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(&t))
            .collect();

        if alternatives.is_empty() {
            return None;
        }

        let source = format!(r"\b(?:{})\b", alternatives.join("|"));
        match Regex::new(&source) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping keyword set with invalid pattern");
                None
            }
        }
    }

    /// Categories this matcher applies, in order
    #[must_use]
    pub fn categories(&self) -> Vec<KeywordCategory> {
        self.sets.iter().map(|s| s.category).collect()
    }

    /// Find all keyword occurrences in `text`
    ///
    /// The text is lower-cased first, so matching is case-insensitive.
    /// Results are grouped by category in pattern-set order, and by position
    /// within each category.
    #[must_use]
    pub fn find_matches(&self, text: &str) -> Vec<KeywordMatch> {
        let lowered = text.to_lowercase();

        self.sets
            .iter()
            .flat_map(|set| {
                set.pattern.find_iter(&lowered).map(|m| KeywordMatch {
                    term: m.as_str().to_string(),
                    category: set.category,
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect()
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(matches: &[KeywordMatch], category: KeywordCategory) -> Vec<&str> {
        matches
            .iter()
            .filter(|m| m.category == category)
            .map(|m| m.term.as_str())
            .collect()
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = KeywordMatcher::new();
        let upper = matcher.find_matches("Dress");
        let lower = matcher.find_matches("dress");

        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].term, "dress");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_repeated_matches_counted() {
        let matcher = KeywordMatcher::new();
        let matches = matcher.find_matches("A gown, another gown and a third GOWN.");
        assert_eq!(terms(&matches, KeywordCategory::Garment), vec!["gown"; 3]);
    }

    #[test]
    fn test_word_boundaries_and_no_stemming() {
        let matcher = KeywordMatcher::new();
        let matches = matcher.find_matches("dresses and suitcases for the fallout");
        assert!(matches.is_empty(), "unexpected matches: {matches:?}");
    }

    #[test]
    fn test_categories_tagged() {
        let matcher = KeywordMatcher::new();
        let matches = matcher.find_matches("Gucci gown debut this spring, a luxury affair");

        assert_eq!(terms(&matches, KeywordCategory::Garment), vec!["gown"]);
        assert_eq!(terms(&matches, KeywordCategory::Theme), vec!["spring"]);
        assert_eq!(terms(&matches, KeywordCategory::Qualifier), vec!["luxury"]);
    }

    #[test]
    fn test_hyphenated_qualifier() {
        let matcher = KeywordMatcher::new();
        let matches = matcher.find_matches("A High-End label");
        assert_eq!(terms(&matches, KeywordCategory::Qualifier), vec!["high-end"]);
    }

    #[test]
    fn test_offsets_point_into_lowered_text() {
        let matcher = KeywordMatcher::new();
        let text = "New Coat";
        let matches = matcher.find_matches(text);
        let lowered = text.to_lowercase();
        assert_eq!(&lowered[matches[0].start..matches[0].end], "coat");
    }

    #[test]
    fn test_from_config_custom_terms() {
        let config = KeywordConfig {
            garments: vec!["Trench Coat".to_string(), "coat".to_string()],
            themes: vec![],
            qualifiers: vec!["vintage".to_string()],
        };
        let matcher = KeywordMatcher::from_config(&config);

        assert_eq!(
            matcher.categories(),
            vec![KeywordCategory::Garment, KeywordCategory::Qualifier]
        );

        let matches = matcher.find_matches("A vintage trench coat and a rain coat");
        assert_eq!(
            terms(&matches, KeywordCategory::Garment),
            vec!["trench coat", "coat"]
        );
    }

    #[test]
    fn test_default_config_equals_default_matcher() {
        let text = "Summer jeans, winter sweater, sustainable skirt trend";
        let from_config = KeywordMatcher::from_config(&KeywordConfig::default());
        assert_eq!(from_config.find_matches(text), KeywordMatcher::new().find_matches(text));
    }
}
