//! NSE Scraper Library
//!
//! Fetches stock listings from the Nairobi Securities Exchange public page,
//! caches them with a fresh/stale two-tier policy, and exposes search and
//! sort operations over the resulting records.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod query;
