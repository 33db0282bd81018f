//! HTTP fetcher with rate limiting and charset detection
//!
//! This module provides the page fetcher used for index and article pages
//! with features including:
//! - Fixed or rotating User-Agent
//! - Rate limiting with governor
//! - Automatic retry with exponential backoff on 429/5xx
//! - Charset detection from the Content-Type header or a `<meta charset>` tag

use crate::config::CrawlerConfig;
use crate::utils::error::FetchError;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use regex::bytes::Regex;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, USER_AGENT},
    Client, Response,
};
use std::num::NonZeroU32;
use std::time::Duration;

/// Pool of browser User-Agent strings for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Upper bound for a single retry backoff
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Bytes scanned for a `<meta charset>` declaration
const META_SNIFF_LEN: usize = 1024;

lazy_static! {
    static ref META_CHARSET: Regex =
        Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_\-:]+)"#)
            .expect("Invalid meta charset pattern");
}

/// Page fetcher
///
/// Every request waits on the rate limiter first. Retryable failures
/// (429, 5xx, timeouts, connection errors) are retried with exponential
/// backoff up to `max_retries` times.
pub struct PageFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Maximum number of retry attempts for failed requests
    max_retries: u32,

    /// Base delay for exponential backoff
    base_delay: Duration,

    /// Fixed user agent, used unless rotation is enabled
    user_agent: String,

    /// Pick a random user agent from the pool per request
    rotate_user_agent: bool,
}

impl PageFetcher {
    /// Create a fetcher from crawler configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(500),
            user_agent: config.user_agent.clone(),
            rotate_user_agent: config.rotate_user_agent,
        })
    }

    /// Override the base backoff delay
    #[must_use]
    pub fn with_retry_backoff(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Fetch a page and decode it to text
    ///
    /// # Errors
    ///
    /// - `FetchError::ServerError` for a non-retryable status
    /// - `FetchError::MaxRetriesExceeded` once retries are exhausted
    /// - `FetchError::Decode` if the body cannot be decoded
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with_referer(url, None).await
    }

    /// Fetch a page, sending `referer` when given
    pub async fn fetch_with_referer(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> Result<String, FetchError> {
        self.rate_limiter.until_ready().await;
        self.fetch_with_retry(url, referer).await
    }

    async fn fetch_with_retry(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> Result<String, FetchError> {
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                tracing::debug!(url, attempt, delay_ms = delay.as_millis() as u64, "Retrying");
                tokio::time::sleep(delay).await;
            }

            let headers = self.build_headers(referer);

            match self.client.get(url).headers(headers).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return decode_response(response).await;
                    } else if Self::should_retry(status.as_u16()) {
                        tracing::debug!(url, status = status.as_u16(), "Retryable status");
                        continue;
                    } else {
                        return Err(FetchError::ServerError(status.as_u16()));
                    }
                }
                Err(e) => {
                    if e.is_builder() {
                        return Err(FetchError::InvalidUrl(url.to_string()));
                    }
                    tracing::debug!(url, error = %e, timeout = e.is_timeout(), "Request failed");
                }
            }
        }

        Err(FetchError::MaxRetriesExceeded)
    }

    /// Exponential backoff before retry `attempt` (1-based), capped at [`MAX_BACKOFF`]
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Retry on 429 and the transient 5xx statuses
    fn should_retry(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    fn build_headers(&self, referer: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let user_agent = if self.rotate_user_agent {
            self.random_user_agent().to_string()
        } else {
            self.user_agent.clone()
        };
        if let Ok(value) = HeaderValue::from_str(&user_agent) {
            headers.insert(USER_AGENT, value);
        }

        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        if let Some(referer) = referer.and_then(|r| HeaderValue::from_str(r).ok()) {
            headers.insert(REFERER, referer);
        }

        headers
    }

    fn random_user_agent(&self) -> &'static str {
        let mut rng = rand::thread_rng();
        USER_AGENTS.choose(&mut rng).unwrap_or(&USER_AGENTS[0])
    }
}

async fn decode_response(response: Response) -> Result<String, FetchError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default();

    let bytes = response.bytes().await?;
    decode_bytes(&bytes, &content_type)
}

/// Charset label from a Content-Type value such as `text/html; charset=UTF-8`
fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

/// Charset declared by a `<meta>` tag near the start of the document
fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LEN)];
    META_CHARSET
        .captures(head)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
}

/// Decode page bytes to a string
///
/// Strategy, in order:
/// 1. charset from the Content-Type header
/// 2. charset from a `<meta>` tag
/// 3. strict UTF-8
/// 4. Windows-1252, which never fails
///
/// # Errors
///
/// Returns `FetchError::Decode` if a declared charset produces malformed output
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    if let Some(encoding) = charset_from_content_type(content_type).or_else(|| charset_from_meta(bytes)) {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            return Err(FetchError::Decode(format!(
                "malformed {} content",
                encoding.name()
            )));
        }
        return Ok(text.into_owned());
    }

    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }

    let (text, _, _) = WINDOWS_1252.decode(bytes);
    Ok(text.into_owned())
}
