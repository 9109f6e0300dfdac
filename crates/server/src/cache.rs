//! In-process read cache.
//!
//! Cached values are JSON documents keyed by the strings defined in
//! [`catalog_core::cache_key`]. Entries carry an optional expiry; expired
//! entries are invisible to `get` and `keys` immediately and are physically
//! removed by [`CacheStore::purge_expired`], which a background task runs
//! periodically (see [`spawn_cleanup_task`]).
//!
//! The cache is local to one process. It is lost on restart and never shared
//! between instances.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Key/value store with per-entry TTL.
pub trait CacheStore: Send + Sync {
    /// Look up a live entry.
    fn get(&self, key: &str) -> Option<Value>;

    /// Insert or replace an entry. `None` means the entry never expires.
    fn set(&self, key: &str, value: Value, ttl: Option<Duration>);

    /// Remove an entry. Returns whether a live entry was removed.
    fn delete(&self, key: &str) -> bool;

    /// Keys of all live entries, in no particular order.
    fn keys(&self) -> Vec<String>;

    /// Drop expired entries, returning how many were removed.
    fn purge_expired(&self) -> usize;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// [`CacheStore`] backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }
        // The read guard is released before removing to avoid a shard deadlock.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now))
    }

    fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| !entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut purged = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }
}

/// Spawn a background task that purges expired cache entries on an interval.
///
/// The interval must be non-zero; see `CacheConfig::cleanup_interval`.
pub fn spawn_cleanup_task(
    cache: Arc<dyn CacheStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::info!(purged = purged, "Cache cleanup task purged expired entries");
            }
        }
    })
}
