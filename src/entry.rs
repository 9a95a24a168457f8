use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cached upstream dataset together with the time it was fetched.
///
/// Serialized as `{"timestamp": <ms>, "data": <payload>}`, which is also the
/// persisted format in durable stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unix timestamp in milliseconds at which `data` was fetched from upstream.
    pub timestamp: i64,

    /// The upstream payload, kept opaque.
    pub data: Value,
}

impl CacheEntry {
    /// Create a new cache entry.
    pub fn new(data: Value, timestamp: i64) -> Self {
        CacheEntry { timestamp, data }
    }

    /// Age of the entry in milliseconds relative to `now_ms`, saturating at the `i64` bounds.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }

    /// Encode as the persisted JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the persisted JSON string.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
