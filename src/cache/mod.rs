//! Cache Module
//!
//! Ephemeral in-memory response cache with lazy TTL expiration.

mod clock;
mod entry;
mod key;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL applied by [`CacheStore::set_with_default_ttl`]
pub const DEFAULT_TTL_SECS: i64 = 300;

/// A cache instance shared between request handlers.
pub type SharedCache<V = serde_json::Value> = Arc<RwLock<CacheStore<V>>>;

/// Wraps a store for sharing.
pub fn shared<V: Clone>(store: CacheStore<V>) -> SharedCache<V> {
    Arc::new(RwLock::new(store))
}
