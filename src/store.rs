use async_trait::async_trait;

use crate::entry::CacheEntry;
use crate::error::CacheError;

/// A store is a common interface for reading and writing cache entries.
///
/// Writes are unconditional overwrites (last writer wins). Failures must be
/// reported as errors; a store must never turn an I/O failure into a miss.
#[async_trait]
pub trait Store: Send + Sync {
    /// A name for metrics/tracing.
    ///
    /// # Example
    /// - "hashmap"
    /// - "redis"
    fn name(&self) -> &'static str;

    /// Return the cached entry.
    ///
    /// The response must be `None` for cache misses.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Store the entry under the given key, replacing whatever was there.
    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;
}
