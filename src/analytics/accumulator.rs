//! Trend accumulation across documents
//!
//! This module provides functionality for:
//! - Counting brand, designer, garment and theme mentions per category
//! - Recording per-key sentiment observations
//! - Applying one document's extraction results under a [`SentimentPolicy`]
//!
//! Counters never decrease and score histories never shrink during a run.
//! Keys are `(category, term)` pairs, so the same term seen as a garment and
//! as a brand is tracked twice, independently.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::keywords::{KeywordCategory, KeywordMatch};
use crate::nlp::{EntityLabel, RecognizedEntity};

/// Counter category a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    /// Organizations recognized in the text
    Brand,

    /// People recognized in the text
    Designer,

    /// Garment keyword matches
    Garment,

    /// Seasonal/theme keyword matches
    Theme,
}

impl TrendCategory {
    /// All categories in reporting order
    pub const ALL: [TrendCategory; 4] = [Self::Brand, Self::Designer, Self::Garment, Self::Theme];

    /// Category an entity label is routed to, if any
    #[must_use]
    pub fn from_entity_label(label: &EntityLabel) -> Option<Self> {
        match label {
            EntityLabel::Organization => Some(Self::Brand),
            EntityLabel::Person => Some(Self::Designer),
            EntityLabel::Other(_) => None,
        }
    }

    /// Category a keyword match is routed to, if any
    ///
    /// Qualifier matches are not routed anywhere.
    #[must_use]
    pub fn from_keyword_category(category: KeywordCategory) -> Option<Self> {
        match category {
            KeywordCategory::Garment => Some(Self::Garment),
            KeywordCategory::Theme => Some(Self::Theme),
            KeywordCategory::Qualifier => None,
        }
    }

    /// Plural counter name (`brands`, `designers`, `garments`, `themes`)
    #[must_use]
    pub fn counter_name(&self) -> &'static str {
        match self {
            Self::Brand => "brands",
            Self::Designer => "designers",
            Self::Garment => "garments",
            Self::Theme => "themes",
        }
    }

    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Designer => "designer",
            Self::Garment => "garment",
            Self::Theme => "theme",
        }
    }
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a tracked entity or keyword
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrendKey {
    /// Counter the key belongs to
    pub category: TrendCategory,

    /// Normalized (trimmed, lower-cased) term
    pub term: String,
}

impl TrendKey {
    /// Create a key, normalizing the term
    #[must_use]
    pub fn new(category: TrendCategory, term: &str) -> Self {
        Self {
            category,
            term: normalize_term(term),
        }
    }
}

impl fmt::Display for TrendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.term)
    }
}

/// Normalize an entity or keyword span into a key term
#[must_use]
pub fn normalize_term(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Which keys receive a document's sentiment observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentimentPolicy {
    /// Every key present in any counter after the document was counted,
    /// whether or not the document mentions it
    #[default]
    Broadcast,

    /// Only the keys the document itself mentions, once each.
    /// This is a behaviour change relative to `Broadcast`.
    PerDocument,
}

impl SentimentPolicy {
    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::PerDocument => "per-document",
        }
    }
}

impl FromStr for SentimentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "broadcast" => Ok(Self::Broadcast),
            "per-document" | "per_document" | "perdocument" => Ok(Self::PerDocument),
            other => Err(format!(
                "unknown sentiment policy '{other}' (expected 'broadcast' or 'per-document')"
            )),
        }
    }
}

impl fmt::Display for SentimentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extraction results for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentObservation {
    /// Entities recognized in the document
    pub entities: Vec<RecognizedEntity>,

    /// Keyword matches found in the document
    pub keyword_matches: Vec<KeywordMatch>,

    /// Document-level compound sentiment in [-1.0, 1.0]
    pub compound: f64,
}

impl DocumentObservation {
    /// Keys this document mentions, deduplicated, in key order
    #[must_use]
    pub fn mentioned_keys(&self) -> BTreeSet<TrendKey> {
        let from_entities = self.entities.iter().filter_map(|e| {
            TrendCategory::from_entity_label(&e.label).map(|c| TrendKey::new(c, &e.text))
        });
        let from_keywords = self.keyword_matches.iter().filter_map(|m| {
            TrendCategory::from_keyword_category(m.category).map(|c| TrendKey::new(c, &m.term))
        });

        from_entities
            .chain(from_keywords)
            .filter(|k| !k.term.is_empty())
            .collect()
    }
}

/// Occurrence counts for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounter {
    counts: BTreeMap<String, u64>,
}

impl CategoryCounter {
    /// Increment `term` by one
    pub fn increment(&mut self, term: String) {
        *self.counts.entry(term).or_insert(0) += 1;
    }

    /// Count for `term` (0 when never seen)
    #[must_use]
    pub fn get(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no term has been counted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(term, count)` in term order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(term, count)| (term.as_str(), *count))
    }

    /// The `n` most frequent terms, count descending, ties by term
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(term, count)| (term.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}

/// Per-run trend state: category counters and sentiment histories
///
/// Created once per analysis run, filled document by document by the
/// ingestion loop, then read by the ranker and the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct TrendAccumulator {
    brands: CategoryCounter,
    designers: CategoryCounter,
    garments: CategoryCounter,
    themes: CategoryCounter,

    /// Sentiment observations per key, in arrival order
    scores: BTreeMap<TrendKey, Vec<f64>>,

    /// Documents applied through [`TrendAccumulator::apply_document`]
    documents: u64,
}

impl TrendAccumulator {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn counter_mut(&mut self, category: TrendCategory) -> &mut CategoryCounter {
        match category {
            TrendCategory::Brand => &mut self.brands,
            TrendCategory::Designer => &mut self.designers,
            TrendCategory::Garment => &mut self.garments,
            TrendCategory::Theme => &mut self.themes,
        }
    }

    /// Counter for one category
    #[must_use]
    pub fn counter(&self, category: TrendCategory) -> &CategoryCounter {
        match category {
            TrendCategory::Brand => &self.brands,
            TrendCategory::Designer => &self.designers,
            TrendCategory::Garment => &self.garments,
            TrendCategory::Theme => &self.themes,
        }
    }

    /// Brand (organization) counter
    #[must_use]
    pub fn brands(&self) -> &CategoryCounter {
        &self.brands
    }

    /// Designer (person) counter
    #[must_use]
    pub fn designers(&self) -> &CategoryCounter {
        &self.designers
    }

    /// Garment keyword counter
    #[must_use]
    pub fn garments(&self) -> &CategoryCounter {
        &self.garments
    }

    /// Theme keyword counter
    #[must_use]
    pub fn themes(&self) -> &CategoryCounter {
        &self.themes
    }

    /// Count entities: organizations as brands, persons as designers
    ///
    /// Other labels and blank spans are ignored.
    pub fn record_entities(&mut self, entities: &[RecognizedEntity]) {
        for entity in entities {
            let Some(category) = TrendCategory::from_entity_label(&entity.label) else {
                continue;
            };
            let term = normalize_term(&entity.text);
            if !term.is_empty() {
                self.counter_mut(category).increment(term);
            }
        }
    }

    /// Count keyword matches: garments and themes
    ///
    /// Qualifier matches are accepted and ignored.
    pub fn record_keyword_matches(&mut self, matches: &[KeywordMatch]) {
        for m in matches {
            let Some(category) = TrendCategory::from_keyword_category(m.category) else {
                continue;
            };
            let term = normalize_term(&m.term);
            if !term.is_empty() {
                self.counter_mut(category).increment(term);
            }
        }
    }

    /// Append one sentiment observation to `key`'s history
    ///
    /// Scores are clamped to [-1.0, 1.0]; non-finite scores are dropped.
    pub fn record_sentiment_observation(&mut self, key: TrendKey, compound: f64) {
        if !compound.is_finite() {
            tracing::warn!(key = %key, compound, "Dropping non-finite sentiment observation");
            return;
        }
        self.scores
            .entry(key)
            .or_default()
            .push(compound.clamp(-1.0, 1.0));
    }

    /// Append `compound` to every key present in any category counter
    pub fn broadcast_sentiment(&mut self, compound: f64) {
        let keys: Vec<TrendKey> = self.counter_keys().collect();
        for key in keys {
            self.record_sentiment_observation(key, compound);
        }
    }

    /// Every key currently present in a counter, in category then term order
    pub fn counter_keys(&self) -> impl Iterator<Item = TrendKey> + '_ {
        TrendCategory::ALL.into_iter().flat_map(move |category| {
            self.counter(category).iter().map(move |(term, _)| TrendKey {
                category,
                term: term.to_string(),
            })
        })
    }

    /// Apply one document: count its entities and keywords, then record its
    /// sentiment according to `policy`
    pub fn apply_document(&mut self, observation: &DocumentObservation, policy: SentimentPolicy) {
        self.record_entities(&observation.entities);
        self.record_keyword_matches(&observation.keyword_matches);

        match policy {
            SentimentPolicy::Broadcast => self.broadcast_sentiment(observation.compound),
            SentimentPolicy::PerDocument => {
                for key in observation.mentioned_keys() {
                    self.record_sentiment_observation(key, observation.compound);
                }
            }
        }

        self.documents += 1;
    }

    /// Sentiment history for `key`, if any observation was recorded
    #[must_use]
    pub fn score_history(&self, key: &TrendKey) -> Option<&[f64]> {
        self.scores.get(key).map(Vec::as_slice)
    }

    /// All sentiment histories in key order
    pub fn score_histories(&self) -> impl Iterator<Item = (&TrendKey, &[f64])> {
        self.scores.iter().map(|(key, scores)| (key, scores.as_slice()))
    }

    /// Number of documents applied
    #[must_use]
    pub fn document_count(&self) -> u64 {
        self.documents
    }

    /// Check if nothing has been counted or observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty() && TrendCategory::ALL.iter().all(|c| self.counter(*c).is_empty())
    }
}
