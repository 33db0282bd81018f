//! Ingestion loop
//!
//! Pulls documents from a [`DocumentSource`] one at a time, runs the text
//! capabilities and keyword matcher over each body, and applies the result
//! to a [`TrendAccumulator`].
//!
//! All extraction for a document finishes before the accumulator is touched,
//! so a document whose provider fails leaves no partial counts behind. A
//! failed document is logged and skipped; the run continues with the next one.

pub mod sources;

pub use sources::{DirectorySource, MemorySource};

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::analytics::{DocumentObservation, SentimentPolicy, TrendAccumulator};
use crate::error::{Error, RecoverableError};
use crate::keywords::KeywordMatcher;
use crate::models::Document;
use crate::nlp::TextAnalyzer;

/// A sequential stream of documents
#[async_trait]
pub trait DocumentSource: Send {
    /// Next document, an error for a document that could not be produced,
    /// or `None` when the source is exhausted
    async fn next_document(&mut self) -> Option<Result<Document, Error>>;

    /// Whether another call to `next_document` may yield something
    fn has_more(&self) -> bool;
}

/// Outcome counters for one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestStats {
    /// Documents pulled from the source (including failures)
    pub seen: u64,

    /// Documents applied to the accumulator
    pub processed: u64,

    /// Documents skipped because of an error
    pub failed: u64,

    /// Failures bucketed by error category
    pub failures_by_category: BTreeMap<String, u64>,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl IngestStats {
    fn record_failure(&mut self, error: &Error) {
        self.failed += 1;
        *self
            .failures_by_category
            .entry(error.category().as_str().to_string())
            .or_insert(0) += 1;
    }

    /// Fraction of seen documents that were applied (1.0 when none were seen)
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.seen == 0 {
            return 1.0;
        }
        self.processed as f64 / self.seen as f64
    }
}

/// Drives documents through extraction into the accumulator
pub struct Ingestor<A: TextAnalyzer> {
    analyzer: A,
    matcher: KeywordMatcher,
    accumulator: TrendAccumulator,
    policy: SentimentPolicy,
    delay: Duration,
    stats: IngestStats,
}

impl<A: TextAnalyzer> Ingestor<A> {
    /// Create an ingestor with the broadcast policy and no delay
    pub fn new(analyzer: A, matcher: KeywordMatcher) -> Self {
        Self {
            analyzer,
            matcher,
            accumulator: TrendAccumulator::new(),
            policy: SentimentPolicy::default(),
            delay: Duration::ZERO,
            stats: IngestStats::default(),
        }
    }

    /// Set the sentiment policy
    #[must_use]
    pub fn with_policy(mut self, policy: SentimentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the fixed pause between consecutive documents
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sentiment policy in use
    pub fn policy(&self) -> SentimentPolicy {
        self.policy
    }

    /// Run every extraction step for one document without mutating state
    pub fn observe(&self, document: &Document) -> Result<DocumentObservation, Error> {
        let text = document.body.as_str();

        let entities = self.analyzer.recognize_entities(text)?;
        let keyword_matches = self.matcher.find_matches(text);
        let sentiment = self.analyzer.score_sentiment(text)?.validated()?;

        Ok(DocumentObservation {
            entities,
            keyword_matches,
            compound: sentiment.compound,
        })
    }

    /// Extract and apply one document
    pub fn ingest_document(&mut self, document: &Document) -> Result<(), Error> {
        let observation = self.observe(document)?;

        tracing::debug!(
            source = %document.source,
            entities = observation.entities.len(),
            keywords = observation.keyword_matches.len(),
            compound = observation.compound,
            "Applying document"
        );

        self.accumulator.apply_document(&observation, self.policy);
        Ok(())
    }

    /// Consume `source` until it is exhausted
    ///
    /// Per-document failures are logged and counted; they never abort the
    /// run. The configured delay is applied between documents only.
    pub async fn run<S>(&mut self, source: &mut S) -> IngestStats
    where
        S: DocumentSource + ?Sized,
    {
        let started = Instant::now();
        let mut run_stats = IngestStats::default();

        tracing::info!(
            policy = %self.policy,
            delay_ms = self.delay.as_millis() as u64,
            "Starting ingestion"
        );

        while let Some(next) = source.next_document().await {
            run_stats.seen += 1;

            let outcome = match next {
                Ok(document) => self
                    .ingest_document(&document)
                    .map(|()| document.source),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(source_id) => {
                    run_stats.processed += 1;
                    tracing::debug!(source = %source_id, "Processed document");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        category = e.category().as_str(),
                        "Skipping document"
                    );
                    run_stats.record_failure(&e);
                }
            }

            if !self.delay.is_zero() && source.has_more() {
                tokio::time::sleep(self.delay).await;
            }
        }

        run_stats.elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            seen = run_stats.seen,
            processed = run_stats.processed,
            failed = run_stats.failed,
            elapsed_ms = run_stats.elapsed_ms,
            "Ingestion completed"
        );

        self.merge_stats(&run_stats);
        run_stats
    }

    fn merge_stats(&mut self, run: &IngestStats) {
        self.stats.seen += run.seen;
        self.stats.processed += run.processed;
        self.stats.failed += run.failed;
        self.stats.elapsed_ms += run.elapsed_ms;
        for (category, count) in &run.failures_by_category {
            *self
                .stats
                .failures_by_category
                .entry(category.clone())
                .or_insert(0) += count;
        }
    }

    /// Accumulated trend state
    pub fn accumulator(&self) -> &TrendAccumulator {
        &self.accumulator
    }

    /// Cumulative stats across every `run` call
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Hand over the accumulated trend state
    pub fn into_accumulator(self) -> TrendAccumulator {
        self.accumulator
    }
}
