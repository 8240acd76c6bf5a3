//! Core data models for the NSE scraper
//!
//! This module contains the record type produced by the parser and the
//! provenance-carrying payload returned by the acquisition service.

pub mod fetch;
pub mod parser;
pub mod service;

pub use fetch::{FetchError, HttpFetcher, PageFetcher};
pub use parser::{parse_stocks, ParseError};
pub use service::{ServiceError, StockService};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One listed instrument as scraped from the exchange page
///
/// All fields keep the raw text from the source; numeric interpretations of
/// `volume` and `price` happen lazily when sorting. The parser only builds a
/// `Stock` when both `ticker` and `name` are non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Exchange ticker symbol, e.g. "EQTY"
    pub ticker: String,
    /// Company name, e.g. "Equity Group"
    pub name: String,
    /// Traded volume as displayed, e.g. "1,234,567"
    pub volume: String,
    /// Price as displayed, e.g. "45.50"
    pub price: String,
    /// Change indicator as displayed, e.g. "+2.50 (+5.82%)"
    pub change: String,
}

/// Payload returned by [`service::StockService::fetch_stock_data`]
///
/// Carries the records together with provenance: whether they came out of
/// the cache, whether the cached copy is the stale fallback tier, and when
/// the data was last refreshed from the source.
#[derive(Debug, Clone, Serialize)]
pub struct StockData {
    /// The scraped records
    pub data: Vec<Stock>,
    /// True when the records were served from cache rather than fetched now
    pub cached: bool,
    /// True when the records came from the long-TTL fallback tier
    #[serde(skip_serializing_if = "is_false")]
    pub stale: bool,
    /// Set when stale data is served because a fresh fetch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the served records were last fetched from the source
    pub last_updated: DateTime<Utc>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}
