//! HTTP page fetching with bounded retries
//!
//! The scrape source is a low-traffic public page, so every failed attempt
//! is retried after a linearly escalating delay: attempt 1 waits the base
//! delay, attempt 2 twice the base, and so on. No jitter and no circuit
//! breaker; a down source costs the full retry budget on every call.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;

/// Browser-like identity presented to the source page
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Errors from a single logical fetch (after retries are exhausted)
#[derive(Debug, Error)]
pub enum FetchError {
    /// The per-attempt timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// DNS resolution or TCP connection failed
    #[error("unable to connect to source: {0}")]
    Unreachable(String),

    /// The source answered with a non-success HTTP status
    #[error("source returned status {0}")]
    Status(u16),

    /// Anything else reqwest can produce
    #[error("fetch failed: {0}")]
    Other(String),
}

impl FetchError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unreachable(err.to_string())
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

/// Seam between the acquisition service and the network
///
/// The production implementation is [`HttpFetcher`]; tests substitute stubs
/// to exercise the service's fallback paths without a live source.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the raw body of `url`
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// Retrying reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Builds the fetcher from configuration: per-request timeout, browser
    /// User-Agent and HTML Accept headers. Compression negotiation is left
    /// to the client, which decompresses transparently.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// One GET attempt; non-success statuses count as failures so they get
    /// retried like connection errors.
    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(FetchError::from_reqwest)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        fetch_with_retry(self.max_retries, self.retry_delay, || self.attempt(url)).await
    }
}

/// Runs `attempt` up to `max_retries + 1` times, sleeping between failures.
///
/// The delay schedule is linear: after failed attempt `n` the task suspends
/// for `base_delay * n` before trying again. The sleep is a yield point, so
/// other in-flight requests keep making progress during backoff. On
/// exhaustion the last error is returned.
pub async fn fetch_with_retry<T, F, Fut>(
    max_retries: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = max_retries + 1;
    let mut last_error = None;

    for number in 1..=attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(attempt = number, total = attempts, error = %err, "fetch attempt failed");
                last_error = Some(err);
                if number < attempts {
                    tokio::time::sleep(base_delay * number).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| FetchError::Other("no fetch attempts were made".to_string())))
}
