//! Search, sort and limit operations over scraped records
//!
//! These operate on in-memory record slices after acquisition. All of them
//! return owned vectors and never mutate the caller's slice, so results
//! backed by the cache cannot be corrupted. Field and order arguments are
//! lenient: anything unrecognized silently falls back to the default
//! rather than erroring.

use std::cmp::Ordering;

use crate::data::Stock;

/// Sortable record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Ticker,
    Name,
    Price,
    Change,
    Volume,
}

impl SortField {
    /// Parses a field name, falling back to `Ticker` for anything outside
    /// the allow-list.
    pub fn parse(field: &str) -> Self {
        match field {
            "name" => SortField::Name,
            "price" => SortField::Price,
            "change" => SortField::Change,
            "volume" => SortField::Volume,
            _ => SortField::Ticker,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parses an order name; only `"desc"` descends, everything else
    /// (including absence) ascends.
    pub fn parse(order: Option<&str>) -> Self {
        match order {
            Some("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// Filters records whose ticker or name contains `term`, ignoring case.
///
/// An empty term is a no-op: the input comes back unchanged.
pub fn search_stocks(stocks: &[Stock], term: &str) -> Vec<Stock> {
    if term.is_empty() {
        return stocks.to_vec();
    }

    let needle = term.to_lowercase();
    stocks
        .iter()
        .filter(|stock| {
            stock.ticker.to_lowercase().contains(&needle)
                || stock.name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Sorts records by `field` in `order`.
///
/// `price` compares as floating point and `volume` as integer, both after
/// stripping non-numeric characters and defaulting to zero when nothing
/// numeric remains. Other fields compare as case-insensitive strings.
pub fn sort_stocks(mut stocks: Vec<Stock>, field: Option<&str>, order: Option<&str>) -> Vec<Stock> {
    let field = SortField::parse(field.unwrap_or("ticker"));
    let order = SortOrder::parse(order);

    stocks.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, field);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    stocks
}

/// Truncates to at most `limit` records
pub fn limit_stocks(stocks: &[Stock], limit: usize) -> Vec<Stock> {
    stocks.iter().take(limit).cloned().collect()
}

fn compare_by_field(a: &Stock, b: &Stock, field: SortField) -> Ordering {
    match field {
        SortField::Price => numeric_price(&a.price).total_cmp(&numeric_price(&b.price)),
        SortField::Volume => numeric_volume(&a.volume).cmp(&numeric_volume(&b.volume)),
        SortField::Ticker => compare_text(&a.ticker, &b.ticker),
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::Change => compare_text(&a.change, &b.change),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Extracts a float from price text, keeping digits, dots and minus signs
fn numeric_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Extracts an integer from volume text, keeping digits only
fn numeric_volume(raw: &str) -> i64 {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    cleaned.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(ticker: &str, name: &str, volume: &str, price: &str, change: &str) -> Stock {
        Stock {
            ticker: ticker.to_string(),
            name: name.to_string(),
            volume: volume.to_string(),
            price: price.to_string(),
            change: change.to_string(),
        }
    }

    fn listings() -> Vec<Stock> {
        vec![
            stock("SCOM", "Safaricom", "9,876,543", "18.20", "-0.15 (-0.82%)"),
            stock("EQTY", "Equity Group", "1,234,567", "45.50", "+2.50 (+5.82%)"),
            stock("KCB", "KCB Group", "45,000", "38.00", "+1.00 (+2.70%)"),
        ]
    }

    #[test]
    fn test_search_empty_term_returns_input_unchanged() {
        let stocks = listings();
        let result = search_stocks(&stocks, "");
        assert_eq!(result, stocks);
    }

    #[test]
    fn test_search_matches_ticker_case_insensitively() {
        let result = search_stocks(&listings(), "eqty");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].ticker, "EQTY");
    }

    #[test]
    fn test_search_matches_name_substring() {
        let result = search_stocks(&listings(), "group");
        let tickers: Vec<&str> = result.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["EQTY", "KCB"]);
    }

    #[test]
    fn test_search_without_match_returns_empty() {
        assert!(search_stocks(&listings(), "nonexistent").is_empty());
    }

    #[test]
    fn test_sort_defaults_to_ticker_ascending() {
        let sorted = sort_stocks(listings(), None, None);
        let tickers: Vec<&str> = sorted.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["EQTY", "KCB", "SCOM"]);
    }

    #[test]
    fn test_sort_invalid_field_falls_back_to_ticker() {
        let sorted = sort_stocks(listings(), Some("dividend"), None);
        let tickers: Vec<&str> = sorted.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["EQTY", "KCB", "SCOM"]);
    }

    #[test]
    fn test_sort_price_descending_is_non_increasing() {
        let sorted = sort_stocks(listings(), Some("price"), Some("desc"));
        let prices: Vec<f64> = sorted.iter().map(|s| numeric_price(&s.price)).collect();
        assert!(prices.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(sorted[0].ticker, "EQTY");
    }

    #[test]
    fn test_sort_volume_compares_numerically_not_lexically() {
        // Lexically "45,000" > "1,234,567"; numerically it is smaller.
        let sorted = sort_stocks(listings(), Some("volume"), None);
        let tickers: Vec<&str> = sorted.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["KCB", "EQTY", "SCOM"]);
    }

    #[test]
    fn test_sort_unparseable_numerics_default_to_zero() {
        let mut stocks = listings();
        stocks.push(stock("NOPX", "No Price", "n/a", "-", "0.00"));

        let sorted = sort_stocks(stocks, Some("price"), None);
        assert_eq!(sorted[0].ticker, "NOPX", "zero sorts first ascending");
    }

    #[test]
    fn test_sort_is_idempotent() {
        let once = sort_stocks(listings(), Some("name"), Some("desc"));
        let twice = sort_stocks(once.clone(), Some("name"), Some("desc"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_unknown_order_is_ascending() {
        let sorted = sort_stocks(listings(), Some("price"), Some("sideways"));
        let prices: Vec<f64> = sorted.iter().map(|s| numeric_price(&s.price)).collect();
        assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_limit_truncates_and_preserves_order() {
        let limited = limit_stocks(&listings(), 2);
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].ticker, "SCOM");
    }

    #[test]
    fn test_limit_larger_than_input_returns_everything() {
        assert_eq!(limit_stocks(&listings(), 100).len(), 3);
    }

    #[test]
    fn test_numeric_price_strips_currency_noise() {
        assert_eq!(numeric_price("KES 45.50"), 45.50);
        assert_eq!(numeric_price("-3.25"), -3.25);
        assert_eq!(numeric_price(""), 0.0);
    }

    #[test]
    fn test_numeric_volume_strips_separators() {
        assert_eq!(numeric_volume("1,234,567"), 1_234_567);
        assert_eq!(numeric_volume("n/a"), 0);
    }

    #[test]
    fn test_sort_field_parse_allow_list() {
        assert_eq!(SortField::parse("price"), SortField::Price);
        assert_eq!(SortField::parse("volume"), SortField::Volume);
        assert_eq!(SortField::parse("bogus"), SortField::Ticker);
    }
}
