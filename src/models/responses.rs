//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::StoreStats;
use crate::config::Provider;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /set
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for GET /has/:key
#[derive(Debug, Clone, Serialize)]
pub struct HasResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for DELETE /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for GET /stats
///
/// Remote providers do not report sizes, so every field after `provider` is
/// null for them.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub provider: Provider,
    pub size: Option<usize>,
    pub max_size: Option<usize>,
    pub calculated_size: Option<usize>,
    pub hits: Option<u64>,
    pub misses: Option<u64>,
    pub evictions: Option<u64>,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: Option<f64>,
}

impl StatsResponse {
    pub fn new(provider: Provider, stats: Option<StoreStats>) -> Self {
        Self {
            provider,
            size: stats.as_ref().map(|s| s.size),
            max_size: stats.as_ref().map(|s| s.max_size),
            calculated_size: stats.as_ref().map(|s| s.calculated_size),
            hits: stats.as_ref().map(|s| s.hits),
            misses: stats.as_ref().map(|s| s.misses),
            evictions: stats.as_ref().map(|s| s.evictions),
            hit_rate: stats.as_ref().map(StoreStats::hit_rate),
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    pub provider: Provider,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(provider: Provider) -> Self {
        Self {
            status: "healthy".to_string(),
            provider,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
