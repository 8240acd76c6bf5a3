//! NSE Scraper - Nairobi Securities Exchange stock prices from the terminal
//!
//! Fetches the current listings through the cached acquisition service,
//! applies any requested search/sort/limit operations and prints the result
//! as JSON on stdout. Logs go to stderr, controlled by `RUST_LOG`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nsescrape::cli::Cli;
use nsescrape::config::Config;
use nsescrape::data::StockService;
use nsescrape::query::{limit_stocks, search_stocks, sort_stocks};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let service = StockService::from_config(config)?;

    let mut payload = match service.fetch_stock_data().await {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("error ({}): {}", err.status_code(), err);
            std::process::exit(1);
        }
    };

    if let Some(term) = &cli.search {
        payload.data = search_stocks(&payload.data, term);
    }
    if cli.sort.is_some() || cli.order.is_some() {
        payload.data = sort_stocks(payload.data, cli.sort.as_deref(), cli.order.as_deref());
    }
    if let Some(limit) = cli.limit {
        payload.data = limit_stocks(&payload.data, limit);
    }

    println!("{}", serde_json::to_string_pretty(&payload)?);

    if cli.stats {
        let stats = service.cache_stats();
        eprintln!(
            "cache: {} keys, {} hits, {} misses",
            stats.keys, stats.hits, stats.misses
        );
    }

    Ok(())
}
