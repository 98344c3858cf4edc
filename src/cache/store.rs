//! Cache Store Module
//!
//! Key/expiry map with lazy expiration: an entry is checked against the
//! clock when it is read, and a stale entry is dropped on that read.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_TTL_SECS};

// == Cache Store ==
/// Unbounded in-memory store of computed responses.
///
/// The store does no locking of its own; share it as
/// `Arc<RwLock<CacheStore<V>>>` (see [`crate::cache::SharedCache`]).
#[derive(Debug)]
pub struct CacheStore<V = serde_json::Value> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Time source for stamping and expiry checks
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Get ==
    /// Returns the stored value if the entry exists and has not expired.
    ///
    /// An entry whose expiry is at or before now is removed and reported as
    /// absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.stats.record_hit();
                debug!(key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expired();
                self.stats.set_total_entries(self.entries.len());
                debug!(key, "cache miss (expired)");
                None
            }
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                None
            }
        }
    }

    /// Remaining lifetime of a live entry in milliseconds.
    ///
    /// Does not touch the statistics and never drops anything; a stale or
    /// missing key yields `None`.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<i64> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining_ms(now))
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_seconds`, replacing any prior
    /// entry. A TTL of zero or less stores an already expired entry.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_seconds: i64) {
        let key = key.into();
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_seconds);
        debug!(key = %key, ttl_seconds, "cache set");

        self.entries.insert(key, entry);
        self.stats.record_set();
        self.stats.set_total_entries(self.entries.len());
    }

    /// Stores `value` with the default five minute TTL.
    pub fn set_with_default_ttl(&mut self, key: impl Into<String>, value: V) {
        self.set(key, value, DEFAULT_TTL_SECS);
    }

    // == Invalidate ==
    /// Forces the next `get` for `key` to miss.
    ///
    /// Returns true if an entry was physically present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Physically removes every expired entry and returns how many went.
    ///
    /// Reads already treat these entries as absent; this only frees memory.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.entries.len();
        self.stats.record_purged(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of entries physically held, including stale ones not yet
    /// dropped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
