//! Common test utilities

use std::collections::HashMap;

use trendscope::keywords::{KeywordCategory, KeywordMatch};
use trendscope::nlp::{EntityLabel, RecognizedEntity, SentimentScores, TextAnalyzer};
use trendscope::utils::error::AnalysisError;

/// Analyzer with canned answers
///
/// Entities are found by plain substring search over the configured names.
/// Sentiment comes from an exact body lookup, falling back to `default_compound`.
/// Bodies containing `fail_marker` make sentiment scoring fail.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    pub entities: Vec<(String, EntityLabel)>,
    pub sentiments: HashMap<String, f64>,
    pub default_compound: f64,
    pub fail_marker: Option<String>,
}

#[allow(dead_code)]
impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn org(mut self, name: &str) -> Self {
        self.entities.push((name.to_string(), EntityLabel::Organization));
        self
    }

    pub fn person(mut self, name: &str) -> Self {
        self.entities.push((name.to_string(), EntityLabel::Person));
        self
    }

    pub fn sentiment(mut self, body: &str, compound: f64) -> Self {
        self.sentiments.insert(body.to_string(), compound);
        self
    }

    pub fn default_compound(mut self, compound: f64) -> Self {
        self.default_compound = compound;
        self
    }

    pub fn fail_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }
}

impl TextAnalyzer for ScriptedAnalyzer {
    fn recognize_entities(&self, text: &str) -> Result<Vec<RecognizedEntity>, AnalysisError> {
        let mut found: Vec<(usize, RecognizedEntity)> = self
            .entities
            .iter()
            .flat_map(|(name, label)| {
                text.match_indices(name.as_str())
                    .map(move |(pos, m)| (pos, RecognizedEntity::new(m, label.clone())))
            })
            .collect();
        found.sort_by_key(|(pos, _)| *pos);
        Ok(found.into_iter().map(|(_, e)| e).collect())
    }

    fn score_sentiment(&self, text: &str) -> Result<SentimentScores, AnalysisError> {
        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(AnalysisError::Sentiment(format!("scripted failure on {marker}")));
            }
        }
        let compound = self
            .sentiments
            .get(text)
            .copied()
            .unwrap_or(self.default_compound);
        Ok(SentimentScores::from_compound(compound))
    }
}

/// Build a keyword match without offsets
#[allow(dead_code)]
pub fn keyword(term: &str, category: KeywordCategory) -> KeywordMatch {
    KeywordMatch {
        term: term.to_string(),
        category,
        start: 0,
        end: term.len(),
    }
}
