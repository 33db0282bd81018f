//! Trend accumulation and ranking

pub mod accumulator;
pub mod ranking;

pub use accumulator::{
    normalize_term, CategoryCounter, DocumentObservation, SentimentPolicy, TrendAccumulator,
    TrendCategory, TrendKey,
};
pub use ranking::{rank_trends, RankingTable, TrendRanking};
