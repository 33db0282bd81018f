//! Trend ranking
//!
//! Turns the accumulated sentiment histories into one [`TrendRanking`] per
//! key:
//! - `average_sentiment`: arithmetic mean of the key's history
//! - `frequency`: number of sentiment observations for the key
//! - `trend_strength`: `average_sentiment * frequency`
//!
//! `frequency` counts sentiment observations, not mentions. Under the
//! broadcast policy a key keeps collecting observations from documents that
//! never mention it, so the two diverge.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::accumulator::{TrendAccumulator, TrendCategory, TrendKey};

/// Ranking for one tracked key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRanking {
    /// Counter the key belongs to
    pub category: TrendCategory,

    /// Normalized term
    pub term: String,

    /// Mean of the key's sentiment history
    pub average_sentiment: f64,

    /// Length of the key's sentiment history
    pub frequency: u64,

    /// `average_sentiment * frequency`
    pub trend_strength: f64,
}

impl TrendRanking {
    /// Compute a ranking from a non-empty sentiment history
    ///
    /// Returns `None` for an empty history.
    #[must_use]
    pub fn from_history(key: &TrendKey, history: &[f64]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }

        let frequency = history.len() as u64;
        let average_sentiment = history.iter().sum::<f64>() / history.len() as f64;

        Some(Self {
            category: key.category,
            term: key.term.clone(),
            average_sentiment,
            frequency,
            trend_strength: average_sentiment * frequency as f64,
        })
    }

    /// Key this ranking describes
    #[must_use]
    pub fn key(&self) -> TrendKey {
        TrendKey {
            category: self.category,
            term: self.term.clone(),
        }
    }
}

/// Rank every key with a non-empty sentiment history
///
/// Results come back in key order (category, then term). The accumulator is
/// not modified; ranking twice without new documents gives identical output.
#[must_use]
pub fn rank_trends(accumulator: &TrendAccumulator) -> Vec<TrendRanking> {
    accumulator
        .score_histories()
        .filter_map(|(key, history)| TrendRanking::from_history(key, history))
        .collect()
}

/// Order by strength descending, then frequency descending, then key
fn by_strength(a: &TrendRanking, b: &TrendRanking) -> Ordering {
    b.trend_strength
        .total_cmp(&a.trend_strength)
        .then_with(|| b.frequency.cmp(&a.frequency))
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.term.cmp(&b.term))
}

/// Ranked trends with presentation helpers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingTable {
    entries: Vec<TrendRanking>,
}

impl RankingTable {
    /// Rank an accumulator
    #[must_use]
    pub fn from_accumulator(accumulator: &TrendAccumulator) -> Self {
        Self {
            entries: rank_trends(accumulator),
        }
    }

    /// Entries in key order
    #[must_use]
    pub fn entries(&self) -> &[TrendRanking] {
        &self.entries
    }

    /// Number of ranked keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no key was ranked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up one key
    #[must_use]
    pub fn get(&self, category: TrendCategory, term: &str) -> Option<&TrendRanking> {
        self.entries
            .iter()
            .find(|r| r.category == category && r.term == term)
    }

    /// All entries, strongest first
    #[must_use]
    pub fn sorted_by_strength(&self) -> Vec<TrendRanking> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(by_strength);
        sorted
    }

    /// The `n` strongest entries
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<TrendRanking> {
        let mut sorted = self.sorted_by_strength();
        sorted.truncate(n);
        sorted
    }

    /// Entries of one category, strongest first
    #[must_use]
    pub fn in_category(&self, category: TrendCategory) -> Vec<TrendRanking> {
        self.sorted_by_strength()
            .into_iter()
            .filter(|r| r.category == category)
            .collect()
    }
}

impl From<Vec<TrendRanking>> for RankingTable {
    fn from(entries: Vec<TrendRanking>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::accumulator::{DocumentObservation, SentimentPolicy};
    use crate::keywords::{KeywordCategory, KeywordMatch};
    use crate::nlp::RecognizedEntity;

    fn keyword(term: &str, category: KeywordCategory) -> KeywordMatch {
        KeywordMatch {
            term: term.to_string(),
            category,
            start: 0,
            end: term.len(),
        }
    }

    fn ranking(term: &str, strength: f64, frequency: u64) -> TrendRanking {
        TrendRanking {
            category: TrendCategory::Brand,
            term: term.to_string(),
            average_sentiment: strength / frequency as f64,
            frequency,
            trend_strength: strength,
        }
    }

    #[test]
    fn test_from_history() {
        let key = TrendKey::new(TrendCategory::Brand, "gucci");
        let r = TrendRanking::from_history(&key, &[0.5, 0.8]).unwrap();

        assert!((r.average_sentiment - 0.65).abs() < 1e-9);
        assert_eq!(r.frequency, 2);
        assert!((r.trend_strength - 1.3).abs() < 1e-9);
        assert!(TrendRanking::from_history(&key, &[]).is_none());
    }

    #[test]
    fn test_rank_two_documents() {
        let mut acc = TrendAccumulator::new();
        acc.apply_document(
            &DocumentObservation {
                entities: vec![RecognizedEntity::organization("Gucci")],
                keyword_matches: vec![
                    keyword("gown", KeywordCategory::Garment),
                    keyword("spring", KeywordCategory::Theme),
                    keyword("luxury", KeywordCategory::Qualifier),
                ],
                compound: 0.5,
            },
            SentimentPolicy::Broadcast,
        );
        acc.apply_document(
            &DocumentObservation {
                entities: vec![RecognizedEntity::organization("Gucci")],
                keyword_matches: vec![],
                compound: 0.8,
            },
            SentimentPolicy::Broadcast,
        );

        let table = RankingTable::from_accumulator(&acc);
        assert_eq!(table.len(), 3);

        let gucci = table.get(TrendCategory::Brand, "gucci").unwrap();
        assert_eq!(gucci.frequency, 2);
        assert!((gucci.trend_strength - 1.3).abs() < 1e-9);

        let gown = table.get(TrendCategory::Garment, "gown").unwrap();
        assert_eq!(gown.frequency, 2);
        assert!(table.get(TrendCategory::Garment, "luxury").is_none());
    }

    #[test]
    fn test_empty_accumulator_ranks_nothing() {
        assert!(rank_trends(&TrendAccumulator::new()).is_empty());
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let mut acc = TrendAccumulator::new();
        acc.record_entities(&[RecognizedEntity::organization("Dior")]);
        acc.broadcast_sentiment(-0.3);

        assert_eq!(rank_trends(&acc), rank_trends(&acc));
    }

    #[test]
    fn test_sorted_and_top() {
        let table = RankingTable::from(vec![
            ranking("a", 0.5, 1),
            ranking("b", 2.0, 4),
            ranking("c", -1.0, 2),
            ranking("d", 2.0, 5),
        ]);

        let order: Vec<String> = table
            .sorted_by_strength()
            .into_iter()
            .map(|r| r.term)
            .collect();
        assert_eq!(order, vec!["d", "b", "a", "c"]);

        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(10).len(), 4);
    }
}
