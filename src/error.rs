//! Error types for the cache adapters
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Boxed backend error, keeps client library types out of the public API.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Cache Error Enum ==
/// Unified error type shared by every adapter.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be converted to its stored form
    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Stored payload could not be parsed back into a value
    #[error("Deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Configuration named a provider outside the supported set
    #[error("Unsupported cache provider '{provider}', expected one of: {}", .valid.join(", "))]
    UnsupportedProvider {
        provider: String,
        valid: Vec<&'static str>,
    },

    /// Provider options are malformed or out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Remote backend failed while executing an operation
    #[error("Backend operation '{operation}' failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// Key not found (HTTP gateway only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data (HTTP gateway only)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Wraps a backend-specific failure for the named operation.
    pub fn backend<E>(operation: &'static str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        CacheError::Backend {
            operation,
            source: source.into(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::Serialization(_) => StatusCode::BAD_REQUEST,
            CacheError::Backend { .. } => StatusCode::BAD_GATEWAY,
            CacheError::Deserialization(_)
            | CacheError::UnsupportedProvider { .. }
            | CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_provider_message_lists_valid_providers() {
        let err = CacheError::UnsupportedProvider {
            provider: "unknown".to_string(),
            valid: vec!["memory", "redis", "valkey", "memcached"],
        };
        let message = err.to_string();
        assert!(message.contains("'unknown'"));
        assert!(message.contains("memory, redis, valkey, memcached"));
    }

    #[test]
    fn test_backend_error_names_operation() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = CacheError::backend("GET", io);
        assert_eq!(err.to_string(), "Backend operation 'GET' failed: refused");
    }

    #[test]
    fn test_status_mapping() {
        let not_found = CacheError::NotFound("k".into()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad = CacheError::InvalidRequest("empty key".into()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let backend = CacheError::backend("SET", "timeout").into_response();
        assert_eq!(backend.status(), StatusCode::BAD_GATEWAY);
    }
}
