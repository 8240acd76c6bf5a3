//! Command-line interface for the NSE scraper
//!
//! The binary is a thin consumer of the library: it runs one acquisition
//! through the service, applies the requested query operations and prints
//! the payload as JSON.

use clap::Parser;

/// NSE Scraper - Nairobi Securities Exchange stock prices from the terminal
#[derive(Parser, Debug)]
#[command(name = "nsescrape")]
#[command(about = "Fetch Nairobi Securities Exchange stock prices")]
#[command(version)]
pub struct Cli {
    /// Keep only stocks whose ticker or name contains this term
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Sort field: ticker, name, price, change or volume
    ///
    /// An unrecognized field sorts by ticker.
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort order: asc or desc (default asc)
    #[arg(long, value_name = "ORDER")]
    pub order: Option<String>,

    /// Print at most this many records
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Print cache statistics to stderr after the run
    #[arg(long)]
    pub stats: bool,
}
