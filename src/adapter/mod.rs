//! Adapter Module
//!
//! The capability set every backend implements, and the backends themselves.
//!
//! # Adapters
//! - [`MemoryAdapter`] - in-process LRU store
//! - `RedisAdapter` - Redis or Valkey server (feature `redis`)
//! - `MemcachedAdapter` - Memcached servers (feature `memcached`)

mod memory;

#[cfg(feature = "memcached")]
mod memcached;
#[cfg(feature = "redis")]
mod redis;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::cache::StoreStats;
use crate::config::Provider;
use crate::error::Result;

pub use memory::MemoryAdapter;

#[cfg(feature = "memcached")]
pub use self::memcached::MemcachedAdapter;
#[cfg(feature = "redis")]
pub use self::redis::{Dialect, RedisAdapter};

/// Values an adapter can store.
pub trait CacheValue: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

// == Cache Adapter ==
/// Common capability set shared by every backend.
///
/// Missing keys are never errors: `get` returns `None` and `delete` is a
/// no-op. A stored payload that no longer decodes as `T` is dropped and
/// reported as a miss.
#[async_trait]
pub trait CacheAdapter<T: CacheValue>: Send + Sync {
    /// Backend this adapter talks to.
    fn provider(&self) -> Provider;

    async fn get(&self, key: &str) -> Result<Option<T>>;

    /// Stores `value`, expiring after `ttl` seconds when given and positive.
    async fn set(&self, key: &str, value: &T, ttl: Option<u64>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn has(&self, key: &str) -> Result<bool>;

    /// Empties the whole store or namespace.
    async fn clear(&self) -> Result<()>;

    /// Size statistics, available for in-process stores only.
    fn stats(&self) -> Option<StoreStats> {
        None
    }

    /// Releases the backing connection. Later operations reconnect.
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}
