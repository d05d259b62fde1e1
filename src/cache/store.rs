//! LRU Store Module
//!
//! Main cache engine combining a key index with recency tracking and TTL
//! expiration.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheEntry, Clock, NodeIndex, RecencyList, StoreStats, SystemClock};
use crate::error::{CacheError, Result};

// == LRU Store ==
/// Capacity-bounded key-value store with least-recently-used eviction.
///
/// Values are kept in their serialized string form. Expired entries are
/// invisible to every read and are dropped the first time a read observes
/// them, or by [`LruStore::purge_expired`].
#[derive(Debug)]
pub struct LruStore {
    /// Key to recency-list node
    index: HashMap<String, NodeIndex>,
    /// Entries ordered from most to least recently used
    order: RecencyList<CacheEntry>,
    /// Performance statistics
    stats: StoreStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Default TTL in seconds, 0 = entries never expire by default
    default_ttl: u64,
    clock: Arc<dyn Clock>,
}

impl LruStore {
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries; zero is rejected
    /// * `default_ttl` - TTL in seconds for entries set without one (0 = none)
    pub fn new(capacity: usize, default_ttl: u64) -> Result<Self> {
        Self::with_clock(capacity, default_ttl, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(capacity: usize, default_ttl: u64, clock: Arc<dyn Clock>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::new(),
            order: RecencyList::new(),
            stats: StoreStats::new(capacity),
            capacity,
            default_ttl,
            clock,
        })
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry.
    ///
    /// The entry becomes the most recently used. A positive `ttl` wins over
    /// the store default; a zero or missing `ttl` falls back to it. Inserting
    /// a new key into a full store evicts the least recently used entry first.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) {
        let now = self.clock.now_ms();
        let effective_ttl = match ttl {
            Some(ttl) if ttl > 0 => Some(ttl),
            _ if self.default_ttl > 0 => Some(self.default_ttl),
            _ => None,
        };

        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(idx) {
                *entry = CacheEntry::new(key, value, now, effective_ttl);
            }
            self.order.move_to_front(idx);
            return;
        }

        if self.order.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_back() {
                self.index.remove(&evicted.key);
                self.stats.record_eviction();
            }
        }

        let entry = CacheEntry::new(key.clone(), value, now, effective_ttl);
        let idx = self.order.push_front(entry);
        self.index.insert(key, idx);
    }

    // == Get ==
    /// Returns the value for `key` if present and unexpired, marking it most
    /// recently used. An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let Some(idx) = self.live_index(key) else {
            self.stats.record_miss();
            return None;
        };

        self.order.move_to_front(idx);
        self.stats.record_hit();
        self.order.get(idx).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Returns true if an unexpired entry exists. Does not touch recency.
    pub fn has(&mut self, key: &str) -> bool {
        self.live_index(key).is_some()
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(idx) => self.order.remove(idx).is_some(),
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry. Capacity, default TTL and counters are kept.
    pub fn clear(&mut self) {
        self.index = HashMap::new();
        self.order.clear();
    }

    // == Stats ==
    /// Returns current statistics. `size` includes expired entries not yet
    /// purged.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.size = self.order.len();
        stats
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<NodeIndex> = self
            .order
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(idx, _)| idx)
            .collect();

        for &idx in &expired {
            if let Some(entry) = self.order.remove(idx) {
                self.index.remove(&entry.key);
            }
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    /// Returns the keys from most to least recently used, expired ones
    /// included.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(_, entry)| entry.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // Resolves a key to its node, dropping the entry if it has expired.
    fn live_index(&mut self, key: &str) -> Option<NodeIndex> {
        let idx = *self.index.get(key)?;
        let now = self.clock.now_ms();
        let expired = self
            .order
            .get(idx)
            .map_or(true, |entry| entry.is_expired_at(now));

        if expired {
            self.index.remove(key);
            self.order.remove(idx);
            self.stats.record_expirations(1);
            return None;
        }
        Some(idx)
    }
}
