//! Serialization helper
//!
//! Converts values to and from the JSON strings every backend stores.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

/// Encodes `value` as a JSON string.
///
/// Fails for values JSON cannot represent, such as maps with non-string keys
/// or types whose `Serialize` impl reports an error.
pub fn serialize<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(CacheError::Serialization)
}

/// Decodes a JSON string produced by [`serialize`].
pub fn deserialize<T>(payload: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(payload).map_err(CacheError::Deserialization)
}
