//! Cache Factory
//!
//! Maps a [`CacheConfig`] descriptor to a constructed adapter. Construction
//! is synchronous and performs no I/O; remote adapters connect lazily.

use tracing::info;

use crate::adapter::{CacheAdapter, CacheValue, MemoryAdapter};
use crate::config::{CacheConfig, MemcachedOptions, MemoryOptions, Provider, RedisOptions};
use crate::error::Result;

#[cfg(feature = "memcached")]
use crate::adapter::MemcachedAdapter;
#[cfg(feature = "redis")]
use crate::adapter::{Dialect, RedisAdapter};

/// Adapter selected at runtime.
pub type BoxedCache<T> = Box<dyn CacheAdapter<T>>;

/// Builds the adapter described by `config`.
///
/// Fails with `UnsupportedProvider` for an unknown provider name and with
/// `InvalidConfig` when the options do not fit the provider.
pub fn create_cache<T: CacheValue>(config: &CacheConfig) -> Result<BoxedCache<T>> {
    let provider: Provider = config.provider.parse()?;
    info!(%provider, "creating cache adapter");

    match provider {
        Provider::Memory => {
            let options = config.options::<MemoryOptions>()?;
            Ok(Box::new(create_memory_cache::<T>(&options)?))
        }
        Provider::Redis => create_redis_cache::<T>(&config.options::<RedisOptions>()?),
        Provider::Valkey => create_valkey_cache::<T>(&config.options::<RedisOptions>()?),
        Provider::Memcached => {
            create_memcached_cache::<T>(&config.options::<MemcachedOptions>()?)
        }
    }
}

/// Builds an in-process LRU adapter.
pub fn create_memory_cache<T: CacheValue>(options: &MemoryOptions) -> Result<MemoryAdapter<T>> {
    MemoryAdapter::new(options)
}

/// Builds a Redis adapter.
pub fn create_redis_cache<T: CacheValue>(options: &RedisOptions) -> Result<BoxedCache<T>> {
    #[cfg(feature = "redis")]
    {
        Ok(Box::new(RedisAdapter::<T>::new(options, Dialect::Redis)?))
    }
    #[cfg(not(feature = "redis"))]
    {
        let _ = options;
        Err(feature_disabled(Provider::Redis, "redis"))
    }
}

/// Builds a Valkey adapter. Valkey speaks the Redis protocol.
pub fn create_valkey_cache<T: CacheValue>(options: &RedisOptions) -> Result<BoxedCache<T>> {
    #[cfg(feature = "redis")]
    {
        Ok(Box::new(RedisAdapter::<T>::new(options, Dialect::Valkey)?))
    }
    #[cfg(not(feature = "redis"))]
    {
        let _ = options;
        Err(feature_disabled(Provider::Valkey, "redis"))
    }
}

/// Builds a Memcached adapter.
pub fn create_memcached_cache<T: CacheValue>(options: &MemcachedOptions) -> Result<BoxedCache<T>> {
    #[cfg(feature = "memcached")]
    {
        Ok(Box::new(MemcachedAdapter::<T>::new(options)?))
    }
    #[cfg(not(feature = "memcached"))]
    {
        let _ = options;
        Err(feature_disabled(Provider::Memcached, "memcached"))
    }
}

#[cfg(not(all(feature = "redis", feature = "memcached")))]
fn feature_disabled(provider: Provider, feature: &str) -> crate::error::CacheError {
    crate::error::CacheError::InvalidConfig(format!(
        "provider '{provider}' requires the '{feature}' cargo feature"
    ))
}
