//! Rate-limited HTTP crawler shared by all engines
//!
//! This module provides a rate-limited HTTP client with retry logic and
//! exponential backoff, plus a concurrent crawl that hands every completed
//! page to a callback together with the request that produced it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;
use url::Url;

use crate::correlation::PageRequest;
use crate::error::{EngineError, Result};

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Base delay for exponential backoff (in milliseconds)
const BASE_RETRY_DELAY_MS: u64 = 1000;

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart
/// so a crawl does not hammer the site.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Example
    /// ```
    /// use movie_engine::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// ```
    ///
    /// # Panics
    /// Panics unless `requests_per_second` is finite and positive.
    /// [`HttpClient::with_config`] checks this before building its limiter.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(
                now.checked_sub(min_interval).unwrap_or(now),
            )),
        }
    }

    /// Wait until the next request may start
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            sleep(wait_time).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the HTTP crawler
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Pages fetched at once during a crawl (default: 4)
    pub max_concurrency: usize,
    /// Retry attempts on 429 and 5xx responses (default: 3)
    pub max_retries: u32,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2.0,
            timeout_secs: 30,
            max_concurrency: 4,
            max_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client with rate limiting, retries and concurrent crawling
///
/// This client automatically:
/// - Limits request rate to avoid server overload
/// - Retries on transient errors (429, 5xx) with exponential backoff
/// - Runs crawls with a bounded number of pages in flight
pub struct HttpClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
    max_concurrency: usize,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `EngineError::InvalidConfig` - `requests_per_second` is not a positive number
    /// - `EngineError::HttpError` - the HTTP client cannot be created
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let rps = config.requests_per_second;
        if !rps.is_finite() || rps <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "requests per second must be a positive number, got {}",
                rps
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second),
            max_concurrency: config.max_concurrency.max(1),
            max_retries: config.max_retries,
        })
    }

    /// Fetch the HTML body of a page
    ///
    /// # Errors
    /// - `EngineError::HttpError` - Network or HTTP error after all retries
    /// - `EngineError::RateLimited` - Server returned 429 after all retries
    /// - `EngineError::PageNotFound` - Server returned 404
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        let mut attempt = 0;
        loop {
            self.rate_limiter.acquire().await;
            debug!(%url, attempt, "fetching page");

            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }

            // 404 is final
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EngineError::PageNotFound(url.to_string()));
            }

            let retryable = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || status.is_server_error();
            if retryable && attempt < self.max_retries {
                sleep(Self::backoff_delay(attempt)).await;
                attempt += 1;
                continue;
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(EngineError::RateLimited);
            }
            return Err(response
                .error_for_status()
                .err()
                .map(EngineError::HttpError)
                .unwrap_or_else(|| EngineError::ParseError(format!("unexpected status {}", status))));
        }
    }

    /// Fetch every request and hand each page to `on_page` as it completes.
    ///
    /// Up to `max_concurrency` fetches are in flight at once, so pages arrive
    /// in completion order, not request order. `on_page` runs on the calling
    /// task, one page at a time. A fetch failure is passed to `on_page`
    /// rather than ending the crawl; an error returned by `on_page` stops the
    /// crawl and is returned.
    pub async fn crawl<F>(&self, requests: Vec<PageRequest>, mut on_page: F) -> Result<()>
    where
        F: FnMut(&PageRequest, Result<String>) -> Result<()>,
    {
        debug!(pages = requests.len(), "starting crawl");

        let mut pages = stream::iter(requests)
            .map(|request| async move {
                let body = self.fetch(&request.url).await;
                (request, body)
            })
            .buffer_unordered(self.max_concurrency);

        while let Some((request, body)) = pages.next().await {
            on_page(&request, body)?;
        }
        Ok(())
    }

    /// Calculate exponential backoff delay for retry
    fn backoff_delay(attempt: u32) -> Duration {
        // 1s, 2s, 4s, ...
        Duration::from_millis(BASE_RETRY_DELAY_MS * 2u64.pow(attempt))
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
