//! Stock data acquisition service
//!
//! Coordinates the cache, the retrying fetcher and the parser. Every
//! successful fetch writes two cache tiers: a fresh entry with a short TTL
//! that answers the common case, and a stale entry with a long TTL that is
//! only ever read when a later fetch fails or parses empty. The service is
//! constructed explicitly and shared by reference; it keeps no copy of the
//! records outside the cache.

use thiserror::Error;
use tracing::{error, info, warn};

use super::fetch::{FetchError, HttpFetcher, PageFetcher};
use super::parser::{parse_stocks, ParseError};
use super::{Stock, StockData};
use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;

/// Cache key for the short-TTL tier
const FRESH_CACHE_KEY: &str = "nse_stock_data";

/// Cache key for the long-TTL fallback tier
const STALE_CACHE_KEY: &str = "nse_stock_data_stale";

/// Message attached to payloads served from the fallback tier
const STALE_NOTICE: &str = "fresh data unavailable, serving stale data";

/// Terminal failures surfaced to callers
///
/// All variants are operational conditions, never process-fatal. The
/// boundary layer maps them to HTTP through [`ServiceError::status_code`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The source kept timing out and no fallback data exists
    #[error("request timeout - external service is taking too long to respond")]
    Timeout,

    /// DNS or connection failure with no fallback data
    #[error("unable to connect to external data source")]
    Unreachable,

    /// Any other upstream failure with no fallback data
    #[error("failed to fetch stock data from external source: {0}")]
    Upstream(String),

    /// The document could not be structurally parsed
    #[error("failed to parse stock data from source: {0}")]
    Parse(String),

    /// The source parsed cleanly but produced no records, and no fallback exists
    #[error("no stock data could be parsed from the source")]
    NoData,
}

impl ServiceError {
    /// HTTP status the boundary layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Timeout => 504,
            ServiceError::Unreachable
            | ServiceError::Upstream(_)
            | ServiceError::Parse(_)
            | ServiceError::NoData => 502,
        }
    }
}

/// The acquisition orchestrator
pub struct StockService {
    cache: CacheStore<Vec<Stock>>,
    fetcher: Box<dyn PageFetcher>,
    config: Config,
}

impl StockService {
    /// Builds a service with the production HTTP fetcher
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, Box::new(fetcher)))
    }

    /// Builds a service around an arbitrary fetcher implementation
    pub fn with_fetcher(config: Config, fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            cache: CacheStore::new(),
            fetcher,
            config,
        }
    }

    /// Returns the current records with provenance metadata.
    ///
    /// Decision tree per call:
    /// 1. Fresh cache hit: served as-is, no network touched.
    /// 2. Miss: fetch with retries, then parse.
    ///    - Non-empty parse: both cache tiers are rewritten and the new
    ///      records returned with `cached = false`.
    ///    - Empty parse: the stale tier is consulted; without it the call
    ///      fails with [`ServiceError::NoData`].
    ///    - Fetch failure: the stale tier is consulted and, when present,
    ///      served with the `error` field set; without it the fetch error
    ///      is reclassified into the [`ServiceError`] taxonomy.
    ///
    /// Stale reads never trigger a fetch of their own, and `cached = false`
    /// is only ever returned straight after a successful fetch and
    /// non-empty parse.
    pub async fn fetch_stock_data(&self) -> Result<StockData, ServiceError> {
        if let Some(cached) = self.cache.get(FRESH_CACHE_KEY) {
            info!("serving stock data from cache");
            return Ok(StockData {
                data: cached.data,
                cached: true,
                stale: false,
                error: None,
                last_updated: cached.cached_at,
            });
        }

        info!(url = %self.config.source_url, "fetching fresh stock data from source");
        let body = match self.fetcher.fetch_page(&self.config.source_url).await {
            Ok(body) => body,
            Err(fetch_error) => return self.rescue_fetch_failure(fetch_error),
        };

        let stocks = match parse_stocks(&body) {
            Ok(stocks) => stocks,
            Err(parse_error) => return self.rescue_empty(parse_error.into()),
        };
        if stocks.is_empty() {
            warn!("source page yielded no stock records");
            return self.rescue_empty(ServiceError::NoData);
        }

        self.cache
            .set(FRESH_CACHE_KEY, stocks.clone(), self.config.cache_ttl_seconds);
        self.cache
            .set(STALE_CACHE_KEY, stocks.clone(), self.config.stale_ttl_seconds);
        info!(count = stocks.len(), "fetched and cached stock data");

        Ok(StockData {
            data: stocks,
            cached: false,
            stale: false,
            error: None,
            last_updated: chrono::Utc::now(),
        })
    }

    /// Fallback for a failed fetch: serve the stale tier when it exists,
    /// flagging the payload with an error note; otherwise reclassify the
    /// fetch error.
    fn rescue_fetch_failure(&self, fetch_error: FetchError) -> Result<StockData, ServiceError> {
        if let Some(stale) = self.cache.get(STALE_CACHE_KEY) {
            warn!(error = %fetch_error, "fetch failed, serving stale data");
            return Ok(StockData {
                data: stale.data,
                cached: true,
                stale: true,
                error: Some(STALE_NOTICE.to_string()),
                last_updated: stale.cached_at,
            });
        }

        error!(error = %fetch_error, "fetch failed with no stale fallback");
        Err(match fetch_error {
            FetchError::Timeout => ServiceError::Timeout,
            FetchError::Unreachable(_) => ServiceError::Unreachable,
            other => ServiceError::Upstream(other.to_string()),
        })
    }

    /// Fallback for a fetch that produced no usable records: serve the
    /// stale tier when it exists, otherwise surface `terminal`.
    fn rescue_empty(&self, terminal: ServiceError) -> Result<StockData, ServiceError> {
        if let Some(stale) = self.cache.get(STALE_CACHE_KEY) {
            warn!("no records from source, serving stale data");
            return Ok(StockData {
                data: stale.data,
                cached: true,
                stale: true,
                error: None,
                last_updated: stale.cached_at,
            });
        }
        error!(error = %terminal, "no records from source and no stale fallback");
        Err(terminal)
    }

    /// Cumulative cache statistics for this service instance
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl From<ParseError> for ServiceError {
    fn from(err: ParseError) -> Self {
        ServiceError::Parse(err.to_string())
    }
}
