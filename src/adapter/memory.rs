//! Memory Adapter
//!
//! Serves the capability set from an in-process [`LruStore`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::adapter::{CacheAdapter, CacheValue};
use crate::cache::{lock_store, Clock, LruStore, SharedStore, StoreStats};
use crate::codec;
use crate::config::{MemoryOptions, Provider};
use crate::error::Result;

// == Memory Adapter ==
/// In-process LRU cache for values of type `T`.
///
/// Values are serialized before they reach the store, so a value that cannot
/// be encoded never mutates it. All store access goes through one mutex and
/// never awaits.
pub struct MemoryAdapter<T> {
    store: SharedStore,
    _value: PhantomData<fn() -> T>,
}

impl<T: CacheValue> MemoryAdapter<T> {
    /// Creates an adapter with a fresh store sized by `options`.
    pub fn new(options: &MemoryOptions) -> Result<Self> {
        let store = LruStore::new(options.max_size, options.ttl)?;
        Ok(Self::from_store(store))
    }

    /// Creates an adapter whose store reads time from `clock`.
    pub fn with_clock(options: &MemoryOptions, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = LruStore::with_clock(options.max_size, options.ttl, clock)?;
        Ok(Self::from_store(store))
    }

    pub fn from_store(store: LruStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            _value: PhantomData,
        }
    }

    /// Shared handle to the underlying store, used by the sweep task.
    pub fn store_handle(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Stores an already-encoded payload, bypassing serialization.
    #[cfg(test)]
    pub(crate) fn set_raw(&self, key: &str, payload: &str, ttl: Option<u64>) {
        lock_store(&self.store).set(key.to_string(), payload.to_string(), ttl);
    }
}

#[async_trait]
impl<T: CacheValue> CacheAdapter<T> for MemoryAdapter<T> {
    fn provider(&self) -> Provider {
        Provider::Memory
    }

    async fn get(&self, key: &str) -> Result<Option<T>> {
        let mut store = lock_store(&self.store);
        let Some(payload) = store.get(key) else {
            return Ok(None);
        };

        match codec::deserialize(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "dropping undecodable cache entry");
                store.delete(key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &T, ttl: Option<u64>) -> Result<()> {
        let payload = codec::serialize(value)?;
        lock_store(&self.store).set(key.to_string(), payload, ttl);
        debug!(key, ?ttl, "memory cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        lock_store(&self.store).delete(key);
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        Ok(lock_store(&self.store).has(key))
    }

    async fn clear(&self) -> Result<()> {
        lock_store(&self.store).clear();
        Ok(())
    }

    fn stats(&self) -> Option<StoreStats> {
        Some(lock_store(&self.store).stats())
    }
}

impl<T> fmt::Debug for MemoryAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAdapter")
            .field("store", &self.store)
            .finish()
    }
}
