//! HTML-to-record parsing for the NSE listings page
//!
//! The page carries one table of listings under a `div.t` wrapper. Each row
//! holds ticker, name, volume, price and change in its first five cells.
//! Parsing is pure: the same markup always yields the same records, in
//! document order.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

use super::Stock;

/// CSS selector locating listing rows
const ROW_SELECTOR: &str = "div.t > table > tbody > tr";

/// CSS selector for cells within a row
const CELL_SELECTOR: &str = "td";

/// Structural parse failures
///
/// Distinct from "zero rows produced": a well-formed document without the
/// expected table parses successfully into an empty vector, which the
/// service treats as its own empty-result condition.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A selector failed to compile
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Placeholder for a row with an empty volume cell
const DEFAULT_VOLUME: &str = "0";

/// Placeholder for a row with an empty price cell
const DEFAULT_PRICE: &str = "0.00";

/// Placeholder for a row with an empty change cell
const DEFAULT_CHANGE: &str = "+0.00 (+0.00%)";

/// Extracts stock records from raw page markup.
///
/// Rows with fewer than five cells are skipped, as are rows whose trimmed
/// ticker or name comes out empty. Malformed rows never abort the whole
/// parse. Empty volume/price/change cells are filled with zero-valued
/// placeholders rather than empty strings.
pub fn parse_stocks(html: &str) -> Result<Vec<Stock>, ParseError> {
    let row_selector =
        Selector::parse(ROW_SELECTOR).map_err(|err| ParseError::Selector(err.to_string()))?;
    let cell_selector =
        Selector::parse(CELL_SELECTOR).map_err(|err| ParseError::Selector(err.to_string()))?;

    let document = Html::parse_document(html);
    let mut stocks = Vec::new();

    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 5 {
            continue;
        }

        let ticker = cell_text(&cells[0]);
        let name = cell_text(&cells[1]);
        if ticker.is_empty() || name.is_empty() {
            debug!("skipping row without ticker and name");
            continue;
        }

        stocks.push(Stock {
            ticker,
            name,
            volume: cell_text_or(&cells[2], DEFAULT_VOLUME),
            price: cell_text_or(&cells[3], DEFAULT_PRICE),
            change: cell_text_or(&cells[4], DEFAULT_CHANGE),
        });
    }

    Ok(stocks)
}

/// Joins a cell's text nodes and trims surrounding whitespace
fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Like [`cell_text`], but substitutes `default` for an empty cell
fn cell_text_or(cell: &ElementRef, default: &str) -> String {
    let text = cell_text(cell);
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}
