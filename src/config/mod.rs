//! Configuration management for trendscope
//!
//! This module handles loading and validating configuration from environment variables,
//! TOML files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::analytics::SentimentPolicy;

/// Largest accepted `crawler.max_retries`
pub const MAX_RETRIES: u32 = 10;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Trend analysis configuration
    pub analysis: AnalysisConfig,

    /// Keyword pattern configuration
    pub keywords: KeywordConfig,

    /// User preferences used to filter the presentation output
    pub preferences: Preferences,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Index page listing article links
    pub index_url: String,

    /// Substring an anchor href must contain to count as an article link
    pub article_marker: String,

    /// CSS selectors tried in order for the article body
    pub body_selectors: Vec<String>,

    /// CSS selectors tried in order for the article title
    pub title_selectors: Vec<String>,

    /// User agent string
    pub user_agent: String,

    /// Rotate through a pool of browser user agents instead of `user_agent`
    pub rotate_user_agent: bool,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Fixed politeness delay between documents in milliseconds
    pub request_delay_ms: u64,

    /// Rate limit (requests per second)
    pub rate_limit: u32,

    /// Maximum retry attempts for retryable HTTP failures
    pub max_retries: u32,

    /// Maximum number of articles per run (0 = unlimited)
    pub max_articles: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            index_url: String::from("https://www.vogue.com/fashion"),
            article_marker: String::from("/article/"),
            body_selectors: vec![String::from("div.article__body")],
            title_selectors: vec![String::from("h1")],
            user_agent: String::from("Mozilla/5.0"),
            rotate_user_agent: false,
            request_timeout_secs: 30,
            request_delay_ms: 1000,
            rate_limit: 2,
            max_retries: 2,
            max_articles: 0,
        }
    }
}

/// Trend analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Which keys receive a document's sentiment observation
    pub sentiment_policy: SentimentPolicy,

    /// Length of the top-N lists in reports
    pub top_n: usize,

    /// Extra organization names for the built-in entity recognizer
    pub extra_brands: Vec<String>,

    /// Extra person names for the built-in entity recognizer
    pub extra_designers: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sentiment_policy: SentimentPolicy::Broadcast,
            top_n: 10,
            extra_brands: Vec::new(),
            extra_designers: Vec::new(),
        }
    }
}

/// Domain keyword term lists, one per matcher category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Garment-type terms
    pub garments: Vec<String>,

    /// Seasonal/theme terms
    pub themes: Vec<String>,

    /// Qualifier terms (matched but not counted)
    pub qualifiers: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| (*t).to_string()).collect();
        Self {
            garments: owned(crate::keywords::GARMENT_TERMS),
            themes: owned(crate::keywords::THEME_TERMS),
            qualifiers: owned(crate::keywords::QUALIFIER_TERMS),
        }
    }
}

/// User preferences applied by the presentation layer only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Style substrings used to filter the trend ranking
    pub styles: Vec<String>,

    /// Budget range (displayed only)
    pub budget: String,

    /// Preferred brands used to filter brand recommendations
    pub brands: Vec<String>,

    /// Season (displayed only)
    pub season: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            styles: vec![String::from("Minimal"), String::from("Casual")],
            budget: String::from("$100 - $300"),
            brands: Vec::new(),
            season: String::from("Summer 2024"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Override fields from `TRENDSCOPE_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("TRENDSCOPE_INDEX_URL") {
            self.crawler.index_url = url;
        }

        if let Ok(agent) = std::env::var("TRENDSCOPE_USER_AGENT") {
            self.crawler.user_agent = agent;
        }

        if let Some(delay) = env_parse::<u64>("TRENDSCOPE_REQUEST_DELAY_MS")? {
            self.crawler.request_delay_ms = delay;
        }

        if let Some(timeout) = env_parse::<u64>("TRENDSCOPE_REQUEST_TIMEOUT")? {
            self.crawler.request_timeout_secs = timeout;
        }

        if let Some(rate) = env_parse::<u32>("TRENDSCOPE_RATE_LIMIT")? {
            self.crawler.rate_limit = rate;
        }

        if let Some(max) = env_parse::<usize>("TRENDSCOPE_MAX_ARTICLES")? {
            self.crawler.max_articles = max;
        }

        if let Ok(policy) = std::env::var("TRENDSCOPE_SENTIMENT_POLICY") {
            self.analysis.sentiment_policy = policy
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid TRENDSCOPE_SENTIMENT_POLICY")?;
        }

        if let Ok(level) = std::env::var("TRENDSCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = std::env::var("TRENDSCOPE_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawler.index_url.trim().is_empty() {
            anyhow::bail!("index_url must not be empty");
        }

        if self.crawler.article_marker.is_empty() {
            anyhow::bail!("article_marker must not be empty");
        }

        if self.crawler.body_selectors.is_empty() {
            anyhow::bail!("at least one body selector is required");
        }

        if self.crawler.rate_limit == 0 {
            anyhow::bail!("rate_limit must be greater than 0");
        }

        if self.crawler.max_retries > MAX_RETRIES {
            anyhow::bail!("max_retries must be at most {MAX_RETRIES}");
        }

        if self.analysis.top_n == 0 {
            anyhow::bail!("top_n must be greater than 0");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Get the politeness delay between documents as Duration
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.request_delay_ms)
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {key}: {raw}")),
        Err(_) => Ok(None),
    }
}
