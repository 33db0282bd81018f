//! HTML article parsing
//!
//! Extracts the title and plain body text from an article page. The body is
//! the first element matching one of the configured body selectors; its
//! visible text nodes are trimmed and joined with single spaces.

pub mod sanitize;

use scraper::{ElementRef, Html, Selector};

use crate::config::CrawlerConfig;
use crate::models::Document;
use crate::utils::error::ParseError;

/// Title and body extracted from an article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArticle {
    /// Article title, if one was found
    pub title: Option<String>,

    /// Plain body text
    pub body: String,
}

impl ParsedArticle {
    /// Turn the parsed article into an ingestion document
    #[must_use]
    pub fn into_document(self, source: impl Into<String>) -> Document {
        let document = Document::new(source, self.body);
        match self.title {
            Some(title) => document.with_title(title),
            None => document,
        }
    }
}

/// Article page parser with configurable selectors
#[derive(Debug, Clone)]
pub struct ArticleParser {
    body_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
}

impl ArticleParser {
    /// Create a parser from CSS selector strings
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidSelector` for a selector that cannot be parsed
    pub fn new(body_selectors: &[String], title_selectors: &[String]) -> Result<Self, ParseError> {
        Ok(Self {
            body_selectors: compile_selectors(body_selectors)?,
            title_selectors: compile_selectors(title_selectors)?,
        })
    }

    /// Create a parser from crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ParseError> {
        Self::new(&config.body_selectors, &config.title_selectors)
    }

    /// Parse an article page
    ///
    /// # Errors
    ///
    /// Returns `ParseError::BodyNotFound` when no body selector matches. A
    /// body element that exists but holds no text parses to an empty body.
    pub fn parse(&self, html: &str) -> Result<ParsedArticle, ParseError> {
        let document = Html::parse_document(html);

        let body = self
            .body_selectors
            .iter()
            .find_map(|selector| document.select(selector).next())
            .map(visible_text)
            .ok_or(ParseError::BodyNotFound)?;

        let title = self
            .title_selectors
            .iter()
            .filter_map(|selector| document.select(selector).next())
            .map(|el| sanitize::sanitize_text(&visible_text(el)))
            .find(|t| sanitize::has_content(t));

        Ok(ParsedArticle {
            title,
            body: sanitize::sanitize_text(&body),
        })
    }

    /// Parse an article page into a document tagged with `source`
    pub fn parse_document(&self, source: &str, html: &str) -> Result<Document, ParseError> {
        Ok(self.parse(html)?.into_document(source))
    }
}

impl Default for ArticleParser {
    fn default() -> Self {
        // Compile-time constant selectors
        Self {
            body_selectors: vec![Selector::parse("div.article__body").unwrap()],
            title_selectors: vec![Selector::parse("h1").unwrap()],
        }
    }
}

fn compile_selectors(selectors: &[String]) -> Result<Vec<Selector>, ParseError> {
    selectors
        .iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| ParseError::InvalidSelector(format!("{s}: {e:?}")))
        })
        .collect()
}

/// Trimmed text nodes of `element` joined with spaces, skipping scripts and styles
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| matches!(a.value().name(), "script" | "style" | "noscript"));
            (!hidden).then(|| text.trim())
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html><head><title>Vogue</title></head><body>
          <h1>  Gucci's  Spring Show </h1>
          <div class="article__body">
            <p>Designer <b>Sabato De Sarno</b> sent out a gown.</p>
            <script>var tracking = "gown gown";</script>
            <p>A luxury&nbsp;affair.</p>
          </div>
          <div class="article__body"><p>Second body ignored</p></div>
        </body></html>
    "#;

    #[test]
    fn test_parse_article() {
        let parsed = ArticleParser::default().parse(ARTICLE).unwrap();

        assert_eq!(parsed.title.as_deref(), Some("Gucci's Spring Show"));
        assert_eq!(
            parsed.body,
            "Designer Sabato De Sarno sent out a gown. A luxury affair."
        );
    }

    #[test]
    fn test_missing_body() {
        let result = ArticleParser::default().parse("<html><body><p>teaser</p></body></html>");
        assert!(matches!(result, Err(ParseError::BodyNotFound)));
    }

    #[test]
    fn test_empty_body_is_not_an_error() {
        let parsed = ArticleParser::default()
            .parse(r#"<div class="article__body">   </div>"#)
            .unwrap();
        assert_eq!(parsed.body, "");
        assert!(parsed.title.is_none());
    }

    #[test]
    fn test_selector_fallback_order() {
        let parser = ArticleParser::new(
            &["div.missing".to_string(), "article".to_string()],
            &["h2".to_string(), "title".to_string()],
        )
        .unwrap();

        let parsed = parser
            .parse("<html><head><title>Page</title></head><body><article>Body text</article></body></html>")
            .unwrap();
        assert_eq!(parsed.body, "Body text");
        assert_eq!(parsed.title.as_deref(), Some("Page"));
    }

    #[test]
    fn test_invalid_selector() {
        let result = ArticleParser::new(&["div[".to_string()], &[]);
        assert!(matches!(result, Err(ParseError::InvalidSelector(_))));
    }

    #[test]
    fn test_parse_document() {
        let doc = ArticleParser::default()
            .parse_document("https://www.vogue.com/article/gucci", ARTICLE)
            .unwrap();
        assert_eq!(doc.source, "https://www.vogue.com/article/gucci");
        assert!(doc.body.contains("gown"));
        assert!(doc.title.is_some());
    }
}
