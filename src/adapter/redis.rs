//! Redis Adapter
//!
//! Serves the capability set from a Redis or Valkey server. Both speak the
//! same protocol, so one client handles either; [`Dialect`] only selects the
//! reported provider name.

use std::marker::PhantomData;

use ::redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapter::{CacheAdapter, CacheValue};
use crate::codec;
use crate::config::{Provider, RedisOptions};
use crate::error::{CacheError, Result};

/// Which server flavour the adapter is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Redis,
    Valkey,
}

impl Dialect {
    pub fn provider(self) -> Provider {
        match self {
            Dialect::Redis => Provider::Redis,
            Dialect::Valkey => Provider::Valkey,
        }
    }
}

// == Redis Adapter ==
/// Remote cache backed by a Redis-protocol server.
///
/// Construction only validates the URL. The multiplexed connection is opened
/// on first use and shared by every operation until [`CacheAdapter::disconnect`].
pub struct RedisAdapter<T> {
    client: Client,
    dialect: Dialect,
    key_prefix: String,
    connection: Mutex<Option<MultiplexedConnection>>,
    _value: PhantomData<fn() -> T>,
}

impl<T: CacheValue> RedisAdapter<T> {
    pub fn new(options: &RedisOptions, dialect: Dialect) -> Result<Self> {
        let url = options.connection_url();
        let client = Client::open(url.as_str()).map_err(|e| {
            CacheError::InvalidConfig(format!("invalid {} url '{}': {}", dialect.provider(), url, e))
        })?;

        Ok(Self {
            client,
            dialect,
            key_prefix: options.key_prefix.clone(),
            connection: Mutex::new(None),
            _value: PhantomData,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut slot = self.connection.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::backend("CONNECT", e))?;
        info!(provider = %self.dialect.provider(), "connected to remote cache");
        *slot = Some(conn.clone());
        Ok(conn)
    }
}

#[async_trait]
impl<T: CacheValue> CacheAdapter<T> for RedisAdapter<T> {
    fn provider(&self) -> Provider {
        self.dialect.provider()
    }

    async fn get(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.connection().await?;
        let prefixed = self.prefixed_key(key);

        let payload: Option<String> = conn
            .get(&prefixed)
            .await
            .map_err(|e| CacheError::backend("GET", e))?;
        let Some(payload) = payload else {
            return Ok(None);
        };

        match codec::deserialize(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "dropping undecodable cache entry");
                let _: () = conn
                    .del(&prefixed)
                    .await
                    .map_err(|e| CacheError::backend("DEL", e))?;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &T, ttl: Option<u64>) -> Result<()> {
        let payload = codec::serialize(value)?;
        let mut conn = self.connection().await?;
        let prefixed = self.prefixed_key(key);

        match ttl.filter(|&ttl| ttl > 0) {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(&prefixed, payload, ttl)
                    .await
                    .map_err(|e| CacheError::backend("SETEX", e))?;
            }
            None => {
                let _: () = conn
                    .set(&prefixed, payload)
                    .await
                    .map_err(|e| CacheError::backend("SET", e))?;
            }
        }
        debug!(key, ?ttl, "remote cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .del(self.prefixed_key(key))
            .await
            .map_err(|e| CacheError::backend("DEL", e))?;
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        conn.exists(self.prefixed_key(key))
            .await
            .map_err(|e| CacheError::backend("EXISTS", e))
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        if self.key_prefix.is_empty() {
            let _: () = ::redis::cmd("FLUSHDB")
                .query_async(&mut conn)
                .await
                .map_err(|e| CacheError::backend("FLUSHDB", e))?;
            return Ok(());
        }

        let keys: Vec<String> = conn
            .keys(format!("{}*", self.key_prefix))
            .await
            .map_err(|e| CacheError::backend("KEYS", e))?;
        if !keys.is_empty() {
            let _: () = conn
                .del(&keys)
                .await
                .map_err(|e| CacheError::backend("DEL", e))?;
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        if self.connection.lock().await.take().is_some() {
            info!(provider = %self.dialect.provider(), "disconnected from remote cache");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_new_does_not_connect() {
        // Nothing listens on port 1; construction must still succeed
        let options = RedisOptions {
            port: 1,
            ..RedisOptions::default()
        };
        let adapter = RedisAdapter::<Value>::new(&options, Dialect::Redis).unwrap();
        assert_eq!(adapter.dialect(), Dialect::Redis);
    }

    #[test]
    fn test_dialect_reports_provider() {
        let adapter = RedisAdapter::<Value>::new(&RedisOptions::default(), Dialect::Valkey).unwrap();
        assert_eq!(CacheAdapter::<Value>::provider(&adapter), Provider::Valkey);
        assert!(CacheAdapter::<Value>::stats(&adapter).is_none());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let options = RedisOptions {
            url: Some("not-a-url".into()),
            ..RedisOptions::default()
        };
        let result = RedisAdapter::<Value>::new(&options, Dialect::Redis);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_prefixed_key() {
        let options = RedisOptions {
            key_prefix: "app:".into(),
            ..RedisOptions::default()
        };
        let adapter = RedisAdapter::<Value>::new(&options, Dialect::Redis).unwrap();
        assert_eq!(adapter.prefixed_key("user:1"), "app:user:1");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_backend_error() {
        let options = RedisOptions {
            port: 1,
            ..RedisOptions::default()
        };
        let adapter = RedisAdapter::<Value>::new(&options, Dialect::Redis).unwrap();

        let result = adapter.get("k").await;
        assert!(matches!(
            result,
            Err(CacheError::Backend { operation: "CONNECT", .. })
        ));
    }

    #[tokio::test]
    async fn test_disconnect_without_connection_is_noop() {
        let adapter = RedisAdapter::<Value>::new(&RedisOptions::default(), Dialect::Redis).unwrap();
        adapter.disconnect().await.unwrap();
    }
}
