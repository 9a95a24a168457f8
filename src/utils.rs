//! Shared utilities for the cache library.

use chrono::{DateTime, SecondsFormat};
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// Build a store key from an optional prefix and key.
///
/// Format: `{prefix}::{key}`, or just `{key}` without a prefix.
pub fn build_cache_key<P: Display>(prefix: Option<&P>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}::{}", prefix, key),
        None => key.to_string(),
    }
}

/// Get the current time in milliseconds since UNIX epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Format a millisecond timestamp as ISO-8601 in UTC, e.g. `2024-01-01T00:00:00.000Z`.
pub fn iso_from_ms(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
