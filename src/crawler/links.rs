//! Article link discovery on index pages
//!
//! An anchor counts as an article link when its `href` contains the
//! configured marker (e.g. `/article/`). Relative hrefs are resolved against
//! the index page URL. Links are deduplicated in first-seen order.

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::utils::error::ParseError;
use crate::utils::truncate_text;

/// Anchor text beyond this many characters is cut off
const MAX_TITLE_CHARS: usize = 160;

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("Invalid anchor selector");
}

/// An article link found on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    /// Absolute article URL
    pub url: String,

    /// Anchor text, if any
    pub title: Option<String>,
}

/// Extracts article links from index page HTML
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    marker: String,
}

impl LinkExtractor {
    /// Create an extractor matching hrefs that contain `marker`
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Extract article links from `html`, resolving against `base_url`
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidUrl` if `base_url` is not an absolute URL
    pub fn extract(&self, html: &str, base_url: &str) -> Result<Vec<ArticleLink>, ParseError> {
        let base = Url::parse(base_url).map_err(|e| ParseError::InvalidUrl(format!("{base_url}: {e}")))?;
        let document = Html::parse_document(html);

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in document.select(&ANCHOR) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains(&self.marker) {
                continue;
            }

            let Some(url) = Self::resolve(&base, href) else {
                tracing::trace!(href, "Skipping unresolvable link");
                continue;
            };

            if seen.insert(url.clone()) {
                let text = anchor.text().collect::<Vec<_>>().join(" ");
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                links.push(ArticleLink {
                    url,
                    title: (!text.is_empty()).then(|| truncate_text(&text, MAX_TITLE_CHARS)),
                });
            }
        }

        tracing::debug!(base = %base, found = links.len(), "Extracted article links");
        Ok(links)
    }

    /// Resolve `href` to an absolute http(s) URL without a fragment
    fn resolve(base: &Url, href: &str) -> Option<String> {
        let mut url = base.join(href.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.set_fragment(None);
        Some(url.to_string())
    }
}
