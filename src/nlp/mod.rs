//! Text capability provider
//!
//! The trend engine depends on exactly two text capabilities: named entity
//! recognition and document-level sentiment scoring. Both sit behind the
//! [`TextAnalyzer`] trait so the backend can be swapped without touching the
//! accumulator or ranker.
//!
//! [`RuleBasedAnalyzer`] is the built-in backend: a gazetteer/cue-phrase
//! entity recognizer plus a valence-lexicon sentiment scorer.

pub mod entities;
pub mod sentiment;

pub use entities::GazetteerRecognizer;
pub use sentiment::LexiconSentiment;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::utils::error::AnalysisError;

/// Entity category tag returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    /// Organization (routed to the brand counter)
    Organization,

    /// Person (routed to the designer counter)
    Person,

    /// Any other provider tag (ignored by the accumulator)
    Other(String),
}

impl EntityLabel {
    /// Parse a provider tag such as `ORG` or `PERSON`
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "ORG" | "ORGANIZATION" | "ORGANISATION" => Self::Organization,
            "PERSON" | "PER" => Self::Person,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Organization => "ORG",
            Self::Person => "PERSON",
            Self::Other(tag) => tag,
        }
    }
}

/// An entity span recognized in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    /// Span text as it appears in the document
    pub text: String,

    /// Category tag
    pub label: EntityLabel,
}

impl RecognizedEntity {
    /// Create a new recognized entity
    #[must_use]
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    /// Organization entity
    #[must_use]
    pub fn organization(text: impl Into<String>) -> Self {
        Self::new(text, EntityLabel::Organization)
    }

    /// Person entity
    #[must_use]
    pub fn person(text: impl Into<String>) -> Self {
        Self::new(text, EntityLabel::Person)
    }
}

/// Document-level sentiment polarity scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    /// Normalised overall polarity in [-1.0, 1.0]
    pub compound: f64,

    /// Proportion of positive signal
    pub positive: f64,

    /// Proportion of negative signal
    pub negative: f64,

    /// Proportion of neutral tokens
    pub neutral: f64,
}

impl SentimentScores {
    /// Scores carrying only a compound value
    #[must_use]
    pub fn from_compound(compound: f64) -> Self {
        Self {
            compound,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
        }
    }

    /// Reject compound values outside [-1.0, 1.0] or not a number
    pub fn validated(self) -> Result<Self, AnalysisError> {
        if self.compound.is_finite() && (-1.0..=1.0).contains(&self.compound) {
            Ok(self)
        } else {
            Err(AnalysisError::InvalidScore(self.compound))
        }
    }
}

/// The two text capabilities the trend engine consumes
///
/// Implementations are expected to be stateless with respect to the engine:
/// the same text yields the same result.
pub trait TextAnalyzer: Send + Sync {
    /// Recognize entity spans with their category tags
    fn recognize_entities(&self, text: &str) -> Result<Vec<RecognizedEntity>, AnalysisError>;

    /// Score the sentiment of the whole document
    fn score_sentiment(&self, text: &str) -> Result<SentimentScores, AnalysisError>;
}

impl<T: TextAnalyzer + ?Sized> TextAnalyzer for Box<T> {
    fn recognize_entities(&self, text: &str) -> Result<Vec<RecognizedEntity>, AnalysisError> {
        (**self).recognize_entities(text)
    }

    fn score_sentiment(&self, text: &str) -> Result<SentimentScores, AnalysisError> {
        (**self).score_sentiment(text)
    }
}

/// Built-in analyzer combining the gazetteer recognizer and lexicon scorer
#[derive(Debug, Clone, Default)]
pub struct RuleBasedAnalyzer {
    recognizer: GazetteerRecognizer,
    sentiment: LexiconSentiment,
}

impl RuleBasedAnalyzer {
    /// Create an analyzer with the built-in gazetteers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer extended with configured brand/designer names
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            recognizer: GazetteerRecognizer::with_extra(
                &config.extra_brands,
                &config.extra_designers,
            ),
            sentiment: LexiconSentiment::new(),
        }
    }
}

impl TextAnalyzer for RuleBasedAnalyzer {
    fn recognize_entities(&self, text: &str) -> Result<Vec<RecognizedEntity>, AnalysisError> {
        Ok(self.recognizer.recognize(text))
    }

    fn score_sentiment(&self, text: &str) -> Result<SentimentScores, AnalysisError> {
        self.sentiment.score(text).validated()
    }
}
