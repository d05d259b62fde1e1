//! Unicache - one cache interface over several storage engines
//!
//! Callers program against [`CacheAdapter`] and pick a backend at runtime
//! through [`create_cache`]: an in-process LRU store with TTL expiration, or
//! a Redis, Valkey or Memcached server.

pub mod adapter;
pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod factory;
pub mod models;
pub mod tasks;

pub use adapter::{CacheAdapter, CacheValue, MemoryAdapter};
pub use api::AppState;
pub use config::{CacheConfig, Config, MemcachedOptions, MemoryOptions, Provider, RedisOptions};
pub use error::{CacheError, Result};
pub use factory::{
    create_cache, create_memcached_cache, create_memory_cache, create_redis_cache,
    create_valkey_cache, BoxedCache,
};
pub use tasks::spawn_sweep_task;
