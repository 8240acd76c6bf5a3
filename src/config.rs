//! Configuration for the scraper
//!
//! All settings have built-in defaults and can be overridden through
//! environment variables. A malformed value falls back to the default
//! rather than failing startup.

use std::env;
use std::str::FromStr;

/// Default URL of the NSE listings page
const DEFAULT_SOURCE_URL: &str = "https://afx.kwayisi.org/nse/";

/// Runtime configuration for fetching and caching
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the HTML page to scrape
    pub source_url: String,
    /// Per-attempt HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Number of retries after the first failed attempt
    pub max_retries: u32,
    /// Base delay between retries in milliseconds; attempt `n` waits `n` times this
    pub retry_delay_ms: u64,
    /// Time-to-live for the fresh cache entry in seconds
    pub cache_ttl_seconds: u64,
    /// Time-to-live for the stale fallback entry in seconds
    pub stale_ttl_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            request_timeout_ms: 30_000,
            max_retries: 3,
            retry_delay_ms: 2_000,
            cache_ttl_seconds: 300,
            stale_ttl_seconds: 86_400,
        }
    }
}

impl Config {
    /// Builds a Config from environment variables, falling back to defaults
    /// for anything unset or unparseable.
    ///
    /// Recognized variables: `NSE_DATA_SOURCE_URL`, `REQUEST_TIMEOUT_MS`,
    /// `MAX_RETRIES`, `RETRY_DELAY_MS`, `CACHE_TTL_SECONDS`,
    /// `STALE_TTL_SECONDS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            source_url: env::var("NSE_DATA_SOURCE_URL").unwrap_or(defaults.source_url),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            max_retries: env_parse("MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_parse("RETRY_DELAY_MS", defaults.retry_delay_ms),
            cache_ttl_seconds: env_parse("CACHE_TTL_SECONDS", defaults.cache_ttl_seconds),
            stale_ttl_seconds: env_parse("STALE_TTL_SECONDS", defaults.stale_ttl_seconds),
        }
    }
}

/// Reads an environment variable and parses it, returning `default` when the
/// variable is missing or does not parse.
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.source_url, "https://afx.kwayisi.org/nse/");
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 2_000);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.stale_ttl_seconds, 86_400);
    }

    #[test]
    fn test_from_env_reads_overrides_and_ignores_garbage() {
        // Single test mutates the process environment sequentially to avoid
        // races between parallel test threads.
        env::set_var("NSE_DATA_SOURCE_URL", "http://localhost:8080/nse");
        env::set_var("MAX_RETRIES", "5");
        env::set_var("REQUEST_TIMEOUT_MS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.source_url, "http://localhost:8080/nse");
        assert_eq!(config.max_retries, 5);
        // Garbage value falls back to the default
        assert_eq!(config.request_timeout_ms, 30_000);

        env::remove_var("NSE_DATA_SOURCE_URL");
        env::remove_var("MAX_RETRIES");
        env::remove_var("REQUEST_TIMEOUT_MS");
    }

    #[test]
    fn test_env_parse_missing_variable_returns_default() {
        assert_eq!(env_parse("NSESCRAPE_TEST_UNSET_VARIABLE", 42u64), 42);
    }
}
