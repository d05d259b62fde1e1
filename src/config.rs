//! Configuration Module
//!
//! Cache descriptors consumed by the factory, per-provider options, and the
//! gateway configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{CacheError, Result};

// == Provider ==
/// Supported cache backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Memory,
    Redis,
    Valkey,
    Memcached,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Memory,
        Provider::Redis,
        Provider::Valkey,
        Provider::Memcached,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Memory => "memory",
            Provider::Redis => "redis",
            Provider::Valkey => "valkey",
            Provider::Memcached => "memcached",
        }
    }

    /// Names of every supported provider, in declaration order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|provider| provider.as_str()).collect()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == s)
            .ok_or_else(|| CacheError::UnsupportedProvider {
                provider: s.to_string(),
                valid: Self::names(),
            })
    }
}

// == Memory Options ==
/// Options for the in-process LRU provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryOptions {
    /// Maximum number of entries
    pub max_size: usize,
    /// Default TTL in seconds, 0 = no default expiration
    pub ttl: u64,
}

impl Default for MemoryOptions {
    fn default() -> Self {
        Self {
            max_size: 1000,
            ttl: 0,
        }
    }
}

// == Redis Options ==
/// Options shared by the Redis and Valkey providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisOptions {
    /// Full connection URL; overrides host, port, password and db when set
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
    /// Prefix prepended to every key; also scopes `clear`
    pub key_prefix: String,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            url: None,
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
            key_prefix: String::new(),
        }
    }
}

impl RedisOptions {
    /// Resolves the connection URL.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let auth = match &self.password {
            Some(password) => format!(":{password}@"),
            None => String::new(),
        };
        format!("redis://{auth}{}:{}/{}", self.host, self.port, self.db)
    }
}

// == Memcached Options ==
/// Options for the Memcached provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemcachedOptions {
    /// Server addresses, `host:port` or `memcache://host:port`
    pub servers: Vec<String>,
    /// Prefix prepended to every key
    pub key_prefix: String,
}

impl Default for MemcachedOptions {
    fn default() -> Self {
        Self {
            servers: vec!["127.0.0.1:11211".to_string()],
            key_prefix: String::new(),
        }
    }
}

impl MemcachedOptions {
    /// Server URLs in the form the memcache client expects.
    pub fn server_urls(&self) -> Vec<String> {
        self.servers
            .iter()
            .map(|server| {
                if server.starts_with("memcache://") {
                    server.clone()
                } else {
                    format!("memcache://{server}")
                }
            })
            .collect()
    }
}

// == Cache Config ==
/// Descriptor handed to the factory: a provider name and its options.
///
/// The provider is kept as a raw string so that an unknown name surfaces as
/// `UnsupportedProvider` from the factory rather than as a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub provider: String,
    #[serde(default)]
    pub options: Value,
}

impl CacheConfig {
    pub fn new(provider: impl Into<String>, options: Value) -> Self {
        Self {
            provider: provider.into(),
            options,
        }
    }

    pub fn memory(options: &MemoryOptions) -> Self {
        Self::new(
            Provider::Memory.as_str(),
            json!({ "max_size": options.max_size, "ttl": options.ttl }),
        )
    }

    /// Parses the options record into a provider's typed options.
    ///
    /// Missing or null options yield the provider defaults.
    pub fn options<O>(&self) -> Result<O>
    where
        O: DeserializeOwned + Default,
    {
        if self.options.is_null() {
            return Ok(O::default());
        }
        serde_json::from_value(self.options.clone()).map_err(|e| {
            CacheError::InvalidConfig(format!("invalid {} options: {}", self.provider, e))
        })
    }
}

// == Gateway Config ==
/// HTTP gateway configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache descriptor passed to the factory
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds (memory provider only)
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PROVIDER` - memory, redis, valkey or memcached (default: memory)
    /// - `CACHE_MAX_SIZE` - Maximum entries for memory (default: 1000)
    /// - `CACHE_TTL` - Default TTL in seconds for memory (default: 0)
    /// - `REDIS_URL` / `VALKEY_URL` - Connection URL for redis / valkey
    /// - `MEMCACHED_SERVERS` - Comma separated server list
    /// - `CACHE_KEY_PREFIX` - Key prefix for remote providers
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expired entry sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let provider = env::var("CACHE_PROVIDER").unwrap_or_else(|_| "memory".to_string());
        let key_prefix = env::var("CACHE_KEY_PREFIX").unwrap_or_default();

        let options = match provider.parse::<Provider>() {
            Ok(Provider::Memory) => {
                let defaults = MemoryOptions::default();
                json!({
                    "max_size": parse_env("CACHE_MAX_SIZE", defaults.max_size),
                    "ttl": parse_env("CACHE_TTL", defaults.ttl),
                })
            }
            Ok(Provider::Redis) => json!({
                "url": env::var("REDIS_URL").ok(),
                "key_prefix": key_prefix,
            }),
            Ok(Provider::Valkey) => json!({
                "url": env::var("VALKEY_URL").ok(),
                "key_prefix": key_prefix,
            }),
            Ok(Provider::Memcached) => {
                let servers = env::var("MEMCACHED_SERVERS")
                    .map(|raw| {
                        raw.split(',')
                            .map(str::trim)
                            .filter(|server| !server.is_empty())
                            .map(String::from)
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_else(|_| MemcachedOptions::default().servers);
                json!({ "servers": servers, "key_prefix": key_prefix })
            }
            // Left for the factory to reject with the full provider list
            Err(_) => Value::Null,
        };

        Self {
            cache: CacheConfig::new(provider, options),
            server_port: parse_env("SERVER_PORT", 3000),
            sweep_interval: parse_env("SWEEP_INTERVAL", 1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::memory(&MemoryOptions::default()),
            server_port: 3000,
            sweep_interval: 1,
        }
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
