//! Time-boxed response cache
//!
//! In-memory cache keyed by normalized query, so identical requests within a
//! short window never reach the network (or the quota ledger). Entries
//! expire after a fixed TTL and are lazily removed on read; when an insert
//! pushes the cache past its capacity, the single oldest entry is evicted.
//! Purely a performance optimization: the cache is lost on restart and
//! nothing depends on it for correctness.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

/// Default cache capacity for search-result lists
pub const SEARCH_CACHE_CAPACITY: usize = 100;

/// Default cache capacity for individual video details
pub const DETAILS_CACHE_CAPACITY: usize = 500;

/// A cached value with its insertion time
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    cached_at: DateTime<Utc>,
}

/// TTL + capacity bounded cache
#[derive(Debug)]
pub struct ResponseCache<T> {
    name: &'static str,
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> ResponseCache<T> {
    /// Create a cache with the given TTL and capacity
    pub fn new(name: &'static str, ttl: Duration, capacity: usize) -> Self {
        Self {
            name,
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a key, treating expired entries as misses
    ///
    /// Expired entries are removed on the way out.
    pub async fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(key) {
            Some(entry) => Utc::now() - entry.cached_at > self.ttl,
            None => return None,
        };
        if expired {
            entries.remove(key);
            log::debug!("[youtube:cache] {} expired entry for {}", self.name, key);
            return None;
        }
        log::debug!("[youtube:cache] {} hit for {}", self.name, key);
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert a value, evicting the oldest entry when over capacity
    pub async fn put(&self, key: impl Into<String>, value: T) {
        self.put_at(key, value, Utc::now()).await;
    }

    pub(crate) async fn put_at(&self, key: impl Into<String>, value: T, cached_at: DateTime<Utc>) {
        let key = key.into();
        let mut entries = self.entries.lock().await;
        entries.insert(key, CacheEntry { value, cached_at });

        if entries.len() > self.capacity {
            // Evict the single oldest entry; FIFO-by-age is enough for this
            // workload, full LRU bookkeeping is not worth it.
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.cached_at)
                .map(|(key, _)| key.clone())
            {
                entries.remove(&oldest);
                log::debug!("[youtube:cache] {} evicted oldest entry {}", self.name, oldest);
            }
        }
    }

    /// Remove all expired entries
    pub async fn evict_expired(&self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.cached_at >= cutoff);
        before - entries.len()
    }

    /// Current number of entries (expired ones included until touched)
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

// ============================================================================
// Key Building
// ============================================================================

/// Build a composite cache key from an operation and normalized parameters
///
/// Parameter values are trimmed; timestamp-valued parameters should be
/// bucketed with [`minute_bucket`] before keying so that two callers asking
/// "videos since now minus a week" within the same minute hit the same entry
/// instead of keying on nanosecond-distinct instants.
pub fn cache_key(operation: &str, params: &[(&str, &str)]) -> String {
    let mut key = String::from(operation);
    for (name, value) in params {
        key.push(':');
        key.push_str(name);
        key.push('=');
        key.push_str(value.trim());
    }
    key
}

/// Collapse a timestamp to minute granularity for cache keying
pub fn minute_bucket(at: DateTime<Utc>) -> i64 {
    at.timestamp() / 60
}

// ============================================================================
// Tests
// ============================================================================
