// Core data structures for trendscope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One document handed to the ingestion loop
///
/// The trend engine only looks at `body`; the remaining fields identify the
/// document in logs and reports.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Document {
    /// Where the document came from (URL or file path)
    pub source: String,

    /// Article title, when the fetch layer found one
    pub title: Option<String>,

    /// Plain document text
    pub body: String,

    /// When the document was fetched or read
    pub fetched_at: DateTime<Utc>,
}

impl Document {
    /// Create a document stamped with the current time
    pub fn new(source: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: None,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Attach a title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("https://example.com/article/1", "body").with_title("Title");
        assert_eq!(doc.source, "https://example.com/article/1");
        assert_eq!(doc.title.as_deref(), Some("Title"));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_blank_title_dropped() {
        let doc = Document::new("a.txt", "body").with_title("   ");
        assert!(doc.title.is_none());
    }
}
