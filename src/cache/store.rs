//! Concurrent in-memory key-value store with per-entry expiry
//!
//! Provides a `CacheStore` that keeps values alongside their write timestamp
//! and an expiry derived from a per-entry TTL. Expired entries behave like
//! absent keys and are removed when a read discovers them. Hit and miss
//! counters accumulate for the lifetime of the process; nothing is persisted
//! across restarts.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

/// A stored value plus its bookkeeping timestamps
#[derive(Debug)]
struct Entry<T> {
    /// The cached value
    data: T,
    /// When the value was written
    cached_at: DateTime<Utc>,
    /// When the entry stops being served
    expires_at: DateTime<Utc>,
}

/// Result of a successful cache read
#[derive(Debug)]
pub struct Cached<T> {
    /// The cached value
    pub data: T,
    /// When the value was originally written
    pub cached_at: DateTime<Utc>,
}

/// Cumulative cache statistics since process start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of keys currently held (expired-but-uncollected keys included)
    pub keys: usize,
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing, or only an expired entry
    pub misses: u64,
}

/// Thread-safe TTL cache keyed by string
///
/// Reads and writes may happen concurrently from any number of tasks; the
/// underlying map handles its own synchronization and the counters are
/// atomics. Values are cloned out on read so callers can never alias the
/// stored copy.
#[derive(Debug, Default)]
pub struct CacheStore<T> {
    entries: DashMap<String, Entry<T>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T: Clone> CacheStore<T> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Reads a value from the cache
    ///
    /// Returns `None` for an absent or expired key and counts a miss; an
    /// expired entry found here is dropped from the map. A live entry counts
    /// a hit and is returned together with its write timestamp.
    pub fn get(&self, key: &str) -> Option<Cached<T>> {
        let found_expired = match self.entries.get(key) {
            Some(entry) => {
                if Utc::now() <= entry.expires_at {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(key, "cache hit");
                    return Some(Cached {
                        data: entry.data.clone(),
                        cached_at: entry.cached_at,
                    });
                }
                true
            }
            None => false,
        };

        // The map guard is released above; removal must not overlap a read
        // of the same shard.
        if found_expired {
            self.entries.remove(key);
            debug!(key, "cache entry expired");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "cache miss");
        None
    }

    /// Writes a value with the given TTL in seconds, replacing any previous
    /// entry under the same key. Returns whether the write was applied
    /// (always true for the in-memory store; the flag mirrors the substrate
    /// contract).
    pub fn set(&self, key: &str, value: T, ttl_seconds: u64) -> bool {
        let now = Utc::now();
        self.entries.insert(
            key.to_string(),
            Entry {
                data: value,
                cached_at: now,
                expires_at: now + Duration::seconds(ttl_seconds as i64),
            },
        );
        debug!(key, ttl_seconds, "cache set");
        true
    }

    /// Removes a key, returning how many entries were dropped (0 or 1)
    pub fn delete(&self, key: &str) -> usize {
        let removed = usize::from(self.entries.remove(key).is_some());
        debug!(key, removed, "cache delete");
        removed
    }

    /// Drops every entry; counters keep accumulating
    pub fn flush(&self) {
        self.entries.clear();
        debug!("cache flushed");
    }

    /// Returns cumulative statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            keys: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
