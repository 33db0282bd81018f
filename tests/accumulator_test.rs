//! Trend accumulator and ranker properties

mod common;

use proptest::prelude::*;

use common::keyword;
use trendscope::analytics::{
    rank_trends, DocumentObservation, SentimentPolicy, TrendAccumulator, TrendCategory, TrendKey,
};
use trendscope::keywords::KeywordCategory;
use trendscope::nlp::RecognizedEntity;

const BRANDS: &[&str] = &["gucci", "prada", "zara", "dior"];
const GARMENTS: &[&str] = &["dress", "gown", "coat"];
const THEMES: &[&str] = &["spring", "summer"];

fn observation_strategy() -> impl Strategy<Value = DocumentObservation> {
    (
        prop::collection::vec(prop::sample::select(BRANDS), 0..4),
        prop::collection::vec(prop::sample::select(GARMENTS), 0..4),
        prop::collection::vec(prop::sample::select(THEMES), 0..3),
        -1.0f64..=1.0,
    )
        .prop_map(|(brands, garments, themes, compound)| DocumentObservation {
            entities: brands.into_iter().map(RecognizedEntity::organization).collect(),
            keyword_matches: garments
                .into_iter()
                .map(|g| keyword(g, KeywordCategory::Garment))
                .chain(themes.into_iter().map(|t| keyword(t, KeywordCategory::Theme)))
                .collect(),
            compound,
        })
}

fn policy_strategy() -> impl Strategy<Value = SentimentPolicy> {
    prop_oneof![
        Just(SentimentPolicy::Broadcast),
        Just(SentimentPolicy::PerDocument)
    ]
}

proptest! {
    #[test]
    fn ranking_matches_score_history(
        docs in prop::collection::vec(observation_strategy(), 0..12),
        policy in policy_strategy(),
    ) {
        let mut acc = TrendAccumulator::new();
        for doc in &docs {
            acc.apply_document(doc, policy);
        }

        let rankings = rank_trends(&acc);
        for r in &rankings {
            let history = acc.score_history(&r.key()).unwrap();
            prop_assert!(!history.is_empty());

            let mean = history.iter().sum::<f64>() / history.len() as f64;
            prop_assert_eq!(r.frequency, history.len() as u64);
            prop_assert!((r.average_sentiment - mean).abs() < 1e-9);
            prop_assert!((r.trend_strength - r.average_sentiment * r.frequency as f64).abs() < 1e-9);
        }

        let ranked_keys = rankings.len();
        let history_keys = acc.score_histories().filter(|(_, h)| !h.is_empty()).count();
        prop_assert_eq!(ranked_keys, history_keys);
    }

    #[test]
    fn counters_never_decrease(
        docs in prop::collection::vec(observation_strategy(), 1..12),
        policy in policy_strategy(),
    ) {
        let mut acc = TrendAccumulator::new();
        let mut previous: Vec<(TrendKey, u64, usize)> = Vec::new();

        for doc in &docs {
            acc.apply_document(doc, policy);

            for (key, count, len) in &previous {
                prop_assert!(acc.counter(key.category).get(&key.term) >= *count);
                let now = acc.score_history(key).map_or(0, <[f64]>::len);
                prop_assert!(now >= *len);
            }

            previous = acc
                .counter_keys()
                .map(|key| {
                    let count = acc.counter(key.category).get(&key.term);
                    let len = acc.score_history(&key).map_or(0, <[f64]>::len);
                    (key, count, len)
                })
                .collect();
        }
    }

    #[test]
    fn rank_is_idempotent(docs in prop::collection::vec(observation_strategy(), 0..8)) {
        let mut acc = TrendAccumulator::new();
        for doc in &docs {
            acc.apply_document(doc, SentimentPolicy::Broadcast);
        }
        prop_assert_eq!(rank_trends(&acc), rank_trends(&acc));
    }

    #[test]
    fn broadcast_history_length_counts_documents_since_first_seen(
        docs in prop::collection::vec(observation_strategy(), 1..10),
    ) {
        let mut acc = TrendAccumulator::new();
        let mut first_seen: std::collections::BTreeMap<TrendKey, usize> = Default::default();

        for (i, doc) in docs.iter().enumerate() {
            for key in doc.mentioned_keys() {
                first_seen.entry(key).or_insert(i);
            }
            acc.apply_document(doc, SentimentPolicy::Broadcast);
        }

        for (key, first) in first_seen {
            let len = acc.score_history(&key).map_or(0, <[f64]>::len);
            prop_assert_eq!(len, docs.len() - first);
        }
    }
}

#[test]
fn broadcast_reaches_earlier_keys() {
    let mut acc = TrendAccumulator::new();
    acc.apply_document(
        &DocumentObservation {
            entities: vec![RecognizedEntity::organization("Acme")],
            keyword_matches: vec![],
            compound: 0.1,
        },
        SentimentPolicy::Broadcast,
    );
    acc.apply_document(
        &DocumentObservation {
            entities: vec![RecognizedEntity::organization("Zeta")],
            keyword_matches: vec![],
            compound: 0.9,
        },
        SentimentPolicy::Broadcast,
    );

    let acme = acc.score_history(&TrendKey::new(TrendCategory::Brand, "acme")).unwrap();
    let zeta = acc.score_history(&TrendKey::new(TrendCategory::Brand, "zeta")).unwrap();
    assert_eq!(acme.len(), 2);
    assert_eq!(zeta.len(), 1);
}

#[test]
fn per_document_only_touches_mentioned_keys() {
    let mut acc = TrendAccumulator::new();
    acc.apply_document(
        &DocumentObservation {
            entities: vec![RecognizedEntity::organization("Acme")],
            keyword_matches: vec![],
            compound: 0.1,
        },
        SentimentPolicy::PerDocument,
    );
    acc.apply_document(
        &DocumentObservation {
            entities: vec![RecognizedEntity::organization("Zeta")],
            keyword_matches: vec![],
            compound: 0.9,
        },
        SentimentPolicy::PerDocument,
    );

    let acme = acc.score_history(&TrendKey::new(TrendCategory::Brand, "acme")).unwrap();
    assert_eq!(acme, &[0.1]);
}

#[test]
fn empty_accumulator_ranks_nothing() {
    assert!(rank_trends(&TrendAccumulator::new()).is_empty());
}
