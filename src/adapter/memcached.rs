//! Memcached Adapter
//!
//! Serves the capability set from one or more Memcached servers. The memcache
//! client is blocking, so every call runs on tokio's blocking pool.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use memcache::{Client, MemcacheError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapter::{CacheAdapter, CacheValue};
use crate::cache::current_timestamp_ms;
use crate::codec;
use crate::config::{MemcachedOptions, Provider};
use crate::error::{CacheError, Result};

// == Memcached Adapter ==
/// Remote cache backed by Memcached.
///
/// The client pool is created on first use; construction performs no I/O.
pub struct MemcachedAdapter<T> {
    servers: Vec<String>,
    key_prefix: String,
    client: Mutex<Option<Arc<Client>>>,
    _value: PhantomData<fn() -> T>,
}

impl<T: CacheValue> MemcachedAdapter<T> {
    pub fn new(options: &MemcachedOptions) -> Result<Self> {
        if options.servers.is_empty() {
            return Err(CacheError::InvalidConfig(
                "memcached requires at least one server".to_string(),
            ));
        }

        Ok(Self {
            servers: options.server_urls(),
            key_prefix: options.key_prefix.clone(),
            client: Mutex::new(None),
            _value: PhantomData,
        })
    }

    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    async fn client(&self) -> Result<Arc<Client>> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        let servers = self.servers.clone();
        let client = blocking("CONNECT", move || Client::connect(servers)).await?;
        info!(servers = ?self.servers, "connected to memcached");

        let client = Arc::new(client);
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    async fn run<R, F>(&self, operation: &'static str, call: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&Client) -> std::result::Result<R, MemcacheError> + Send + 'static,
    {
        let client = self.client().await?;
        blocking(operation, move || call(client.as_ref())).await
    }
}

/// Longest relative expiration memcached accepts. Larger values are read as
/// absolute Unix timestamps.
const MAX_RELATIVE_EXPIRATION: u64 = 30 * 24 * 60 * 60;

/// Converts a TTL in seconds into memcached's expiration field.
///
/// 0 means no expiration. TTLs beyond 30 days are sent as an absolute
/// timestamp, saturating at `u32::MAX`.
fn expiration_for(ttl: Option<u64>, now_secs: u64) -> u32 {
    match ttl {
        None | Some(0) => 0,
        Some(ttl) if ttl <= MAX_RELATIVE_EXPIRATION => ttl as u32,
        Some(ttl) => u32::try_from(now_secs.saturating_add(ttl)).unwrap_or(u32::MAX),
    }
}

// Runs a blocking memcache call off the async executor.
async fn blocking<R, F>(operation: &'static str, call: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> std::result::Result<R, MemcacheError> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| CacheError::backend(operation, e))?
        .map_err(|e| CacheError::backend(operation, e))
}

#[async_trait]
impl<T: CacheValue> CacheAdapter<T> for MemcachedAdapter<T> {
    fn provider(&self) -> Provider {
        Provider::Memcached
    }

    async fn get(&self, key: &str) -> Result<Option<T>> {
        let prefixed = self.prefixed_key(key);
        let lookup = prefixed.clone();
        let payload: Option<String> = self.run("GET", move |c| c.get(&lookup)).await?;
        let Some(payload) = payload else {
            return Ok(None);
        };

        match codec::deserialize(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "dropping undecodable cache entry");
                self.run("DELETE", move |c| c.delete(&prefixed)).await?;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &T, ttl: Option<u64>) -> Result<()> {
        let payload = codec::serialize(value)?;
        let prefixed = self.prefixed_key(key);
        let expiration = expiration_for(ttl, current_timestamp_ms() / 1000);

        self.run("SET", move |c| c.set(&prefixed, payload.as_str(), expiration))
            .await?;
        debug!(key, ?ttl, "memcached set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let prefixed = self.prefixed_key(key);
        self.run("DELETE", move |c| c.delete(&prefixed)).await?;
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        let prefixed = self.prefixed_key(key);
        let payload: Option<String> = self.run("GET", move |c| c.get(&prefixed)).await?;
        Ok(payload.is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.run("FLUSH", |c| c.flush()).await
    }

    async fn disconnect(&self) -> Result<()> {
        if self.client.lock().await.take().is_some() {
            info!(servers = ?self.servers, "disconnected from memcached");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_new_normalizes_servers() {
        let options = MemcachedOptions {
            servers: vec!["10.0.0.1:11211".into()],
            key_prefix: "app:".into(),
        };
        let adapter = MemcachedAdapter::<Value>::new(&options).unwrap();

        assert_eq!(adapter.servers(), ["memcache://10.0.0.1:11211"]);
        assert_eq!(adapter.prefixed_key("k"), "app:k");
        assert_eq!(CacheAdapter::<Value>::provider(&adapter), Provider::Memcached);
    }

    #[test]
    fn test_requires_a_server() {
        let options = MemcachedOptions {
            servers: vec![],
            key_prefix: String::new(),
        };
        let result = MemcachedAdapter::<Value>::new(&options);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_disconnect_without_connection_is_noop() {
        let adapter = MemcachedAdapter::<Value>::new(&MemcachedOptions::default()).unwrap();
        adapter.disconnect().await.unwrap();
    }

    #[test]
    fn test_expiration_short_ttl_is_relative() {
        let now = 1_700_000_000;
        assert_eq!(expiration_for(None, now), 0);
        assert_eq!(expiration_for(Some(0), now), 0);
        assert_eq!(expiration_for(Some(60), now), 60);
        assert_eq!(expiration_for(Some(2_592_000), now), 2_592_000);
    }

    #[test]
    fn test_expiration_long_ttl_is_absolute() {
        let now = 1_700_000_000;
        assert_eq!(expiration_for(Some(2_592_001), now), 1_702_592_001);
        assert_eq!(expiration_for(Some(3_000_000), now), 1_703_000_000);
    }

    #[test]
    fn test_expiration_saturates() {
        assert_eq!(expiration_for(Some(u64::MAX), 1_700_000_000), u32::MAX);
        assert_eq!(expiration_for(Some(u64::from(u32::MAX)), 1), u32::MAX);
    }
}
