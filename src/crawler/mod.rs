//! Web crawling for fashion news articles
//!
//! [`ArticleCrawler`] fetches one index page, discovers article links on it
//! and then yields one parsed [`Document`] per article through the
//! [`DocumentSource`] trait. A failed index fetch aborts the run; a failed
//! article fetch or parse only fails that article.

pub mod fetcher;
pub mod links;

pub use fetcher::PageFetcher;
pub use links::{ArticleLink, LinkExtractor};

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::config::CrawlerConfig;
use crate::error::Error;
use crate::ingest::DocumentSource;
use crate::models::Document;
use crate::parser::ArticleParser;

/// Index-driven article crawler
pub struct ArticleCrawler {
    fetcher: PageFetcher,
    parser: ArticleParser,
    links: LinkExtractor,
    index_url: String,
    max_articles: usize,
    queue: VecDeque<ArticleLink>,
}

impl ArticleCrawler {
    /// Create a crawler from configuration
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or a selector is invalid
    pub fn new(config: &CrawlerConfig) -> Result<Self, Error> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            parser: ArticleParser::from_config(config)?,
            links: LinkExtractor::new(config.article_marker.clone()),
            index_url: config.index_url.clone(),
            max_articles: config.max_articles,
            queue: VecDeque::new(),
        })
    }

    /// Replace the page fetcher
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Fetch the index page and queue the article links found on it
    ///
    /// Returns the number of queued articles. Must be called before the
    /// crawler is used as a [`DocumentSource`]; until then it yields nothing.
    ///
    /// # Errors
    ///
    /// Any fetch failure on the index page is returned as-is.
    pub async fn discover(&mut self) -> Result<usize, Error> {
        tracing::info!(index = %self.index_url, "Fetching index page");

        let html = self.fetcher.fetch(&self.index_url).await?;
        let mut links = self.links.extract(&html, &self.index_url)?;

        if self.max_articles > 0 && links.len() > self.max_articles {
            tracing::debug!(
                found = links.len(),
                max_articles = self.max_articles,
                "Truncating article list"
            );
            links.truncate(self.max_articles);
        }

        self.queue = links.into();

        tracing::info!(articles = self.queue.len(), "Discovered articles");
        Ok(self.queue.len())
    }

    /// Articles still waiting to be fetched
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    async fn fetch_article(&self, link: &ArticleLink) -> Result<Document, Error> {
        let html = self
            .fetcher
            .fetch_with_referer(&link.url, Some(&self.index_url))
            .await?;

        let mut document = self.parser.parse_document(&link.url, &html)?;
        if document.title.is_none() {
            if let Some(title) = &link.title {
                document = document.with_title(title.clone());
            }
        }

        Ok(document)
    }
}

#[async_trait]
impl DocumentSource for ArticleCrawler {
    async fn next_document(&mut self) -> Option<Result<Document, Error>> {
        let link = self.queue.pop_front()?;
        tracing::debug!(url = %link.url, remaining = self.queue.len(), "Fetching article");
        Some(self.fetch_article(&link).await)
    }

    fn has_more(&self) -> bool {
        !self.queue.is_empty()
    }
}
