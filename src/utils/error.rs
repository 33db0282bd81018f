//! Error types for the trendscope pipeline
//!
//! This module defines the per-domain error types used by the fetch, parse and
//! text analysis layers.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether retrying the same request could succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout | Self::MaxRetriesExceeded => true,
            Self::ServerError(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Decode(_) | Self::InvalidUrl(_) => false,
        }
    }
}

/// Errors that can occur while extracting article text from HTML
#[derive(Error, Debug)]
pub enum ParseError {
    /// No element matched any of the configured body selectors
    #[error("Article body not found")]
    BodyNotFound,

    /// A configured CSS selector could not be parsed
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local document could not be read
    #[error("Unreadable document {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Errors raised by a text capability provider
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Entity recognition failed for a document
    #[error("Entity recognition failed: {0}")]
    EntityRecognition(String),

    /// Sentiment scoring failed for a document
    #[error("Sentiment scoring failed: {0}")]
    Sentiment(String),

    /// Provider returned a score outside of [-1.0, 1.0] or not a number
    #[error("Invalid compound score: {0}")]
    InvalidScore(f64),

    /// Provider could not be initialised
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}
