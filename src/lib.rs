//! trendscope - Fashion news trend analyzer
//!
//! Reads fashion articles, extracts brands, designers, garment types and
//! seasonal themes, and ranks each one by sentiment-weighted frequency.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`keywords`] - Domain keyword matching (garments, themes, qualifiers)
//! - [`nlp`] - Entity recognition and sentiment scoring behind [`nlp::TextAnalyzer`]
//! - [`analytics`] - Trend accumulation and ranking
//! - [`ingest`] - Document sources and the ingestion loop
//! - [`crawler`] - Index-driven article crawling with rate limiting
//! - [`parser`] - Article HTML parsing and text sanitization
//! - [`report`] - Preference filters, CSV/JSON export and Markdown reports
//! - [`models`] - Core data structures
//! - [`utils`] - Common utilities and domain errors
//!
//! # Example
//!
//! ```no_run
//! use trendscope::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut ingestor = Ingestor::new(RuleBasedAnalyzer::new(), KeywordMatcher::new());
//!     let mut source = MemorySource::from_texts([
//!         "Gucci unveiled a stunning gown for spring.",
//!         "Gucci's new coat was a triumph.",
//!     ]);
//!
//!     ingestor.run(&mut source).await;
//!
//!     for trend in RankingTable::from_accumulator(ingestor.accumulator()).top(5) {
//!         println!("{} {:.2}", trend.term, trend.trend_strength);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod crawler;
pub mod error;
pub mod ingest;
pub mod keywords;
pub mod models;
pub mod nlp;
pub mod parser;
pub mod report;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        rank_trends, RankingTable, SentimentPolicy, TrendAccumulator, TrendCategory, TrendKey,
        TrendRanking,
    };
    pub use crate::config::Config;
    pub use crate::crawler::ArticleCrawler;
    pub use crate::error::{Error, ErrorCategory, RecoverableError, Result};
    pub use crate::ingest::{DirectorySource, DocumentSource, IngestStats, Ingestor, MemorySource};
    pub use crate::keywords::{KeywordCategory, KeywordMatch, KeywordMatcher};
    pub use crate::models::Document;
    pub use crate::nlp::{RecognizedEntity, RuleBasedAnalyzer, SentimentScores, TextAnalyzer};
    pub use crate::report::{ReportRenderer, TrendReport};
}

// Direct re-exports for convenience
pub use models::Document;
