//! Cache Module
//!
//! Bounded in-process store with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::{NodeIndex, RecencyList};
pub use stats::StoreStats;
pub use store::LruStore;

/// Store shared between a memory adapter and its sweep task.
pub type SharedStore = Arc<Mutex<LruStore>>;

/// Locks a shared store.
///
/// Every store operation leaves the index and recency list consistent before
/// it can panic, so a poisoned lock is recovered rather than propagated.
pub fn lock_store(store: &SharedStore) -> MutexGuard<'_, LruStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}
