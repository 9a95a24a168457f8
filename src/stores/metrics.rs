//! Metrics middleware for cache stores.
//!
//! `MetricsStore` wraps any `Store` and reports every read and write to a
//! `MetricsSink`. `TracingSink` forwards them as `tracing` events.
//!
//! # Example
//!
//! ```ignore
//! let redis = Arc::new(RedisStore::new(config).await?);
//! let store: Arc<dyn Store> = Arc::new(MetricsStore::new(redis, Arc::new(TracingSink)));
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::policy::{Classification, classify};
use crate::store::Store;
use crate::utils::now_ms;

/// Status of a cache entry on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEntryStatus {
    /// Entry is inside the freshness window.
    Fresh,
    /// Entry is servable but due for a refresh.
    Stale,
}

/// Metrics emitted by the MetricsStore wrapper.
#[derive(Debug, Clone)]
pub enum CacheMetric {
    /// Emitted on every cache read (get) operation.
    Read {
        /// The cache key that was read.
        key: String,
        /// Whether the key was found in the cache.
        hit: bool,
        /// Status of the entry (only present when hit=true).
        status: Option<CacheEntryStatus>,
        /// Whether the store answered without error.
        success: bool,
        /// Latency of the operation in milliseconds.
        latency_ms: f64,
        /// Name of the store tier (from Store::name()).
        tier: String,
    },
    /// Emitted on every cache write (put) operation.
    Write {
        /// The cache key that was written.
        key: String,
        /// Whether the write succeeded.
        success: bool,
        /// Latency of the operation in milliseconds.
        latency_ms: f64,
        /// Name of the store tier (from Store::name()).
        tier: String,
    },
}

/// Trait for receiving cache metrics.
///
/// `emit` is called in the hot path of every store operation, so
/// implementations should not block.
pub trait MetricsSink: Send + Sync {
    /// Emit a single metric.
    fn emit(&self, metric: CacheMetric);
}

/// Sink that logs every metric as a debug-level `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn emit(&self, metric: CacheMetric) {
        match metric {
            CacheMetric::Read {
                key,
                hit,
                status,
                success,
                latency_ms,
                tier,
            } => tracing::debug!(
                %key, hit, ?status, success, latency_ms, %tier,
                "cache store read"
            ),
            CacheMetric::Write {
                key,
                success,
                latency_ms,
                tier,
            } => tracing::debug!(%key, success, latency_ms, %tier, "cache store write"),
        }
    }
}

/// A store wrapper that emits metrics for all operations.
pub struct MetricsStore {
    inner: Arc<dyn Store>,
    sink: Arc<dyn MetricsSink>,
    tier_name: String,
}

impl MetricsStore {
    /// Create a new MetricsStore wrapping the given store.
    ///
    /// # Arguments
    /// * `inner` - The store to wrap
    /// * `sink` - The metrics sink to emit metrics to
    pub fn new(inner: Arc<dyn Store>, sink: Arc<dyn MetricsSink>) -> Self {
        let tier_name = inner.name().to_string();
        MetricsStore {
            inner,
            sink,
            tier_name,
        }
    }

    fn elapsed_ms(start: Instant) -> f64 {
        start.elapsed().as_secs_f64() * 1000.0
    }
}

#[async_trait]
impl Store for MetricsStore {
    fn name(&self) -> &'static str {
        "metrics"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let start = Instant::now();
        let result = self.inner.get(key).await;
        let latency_ms = Self::elapsed_ms(start);

        let (hit, status) = match &result {
            Ok(Some(entry)) => {
                let status = match classify(Some(entry.timestamp), now_ms()) {
                    Classification::Fresh => Some(CacheEntryStatus::Fresh),
                    Classification::NeedsRefresh => Some(CacheEntryStatus::Stale),
                    Classification::Absent => None,
                };
                (true, status)
            }
            Ok(None) | Err(_) => (false, None),
        };

        self.sink.emit(CacheMetric::Read {
            key: key.to_string(),
            hit,
            status,
            success: result.is_ok(),
            latency_ms,
            tier: self.tier_name.clone(),
        });

        result
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let start = Instant::now();
        let result = self.inner.put(key, entry).await;
        let latency_ms = Self::elapsed_ms(start);

        self.sink.emit(CacheMetric::Write {
            key: key.to_string(),
            success: result.is_ok(),
            latency_ms,
            tier: self.tier_name.clone(),
        });

        result
    }
}
