//! In-memory TTL cache for scraped data

pub mod store;

pub use store::{CacheStats, CacheStore, Cached};
