//! Store implementations for the cache library.

pub mod memory;
pub mod metrics;
pub mod redis;

pub use memory::HashMapStore;
pub use metrics::{CacheEntryStatus, CacheMetric, MetricsSink, MetricsStore, TracingSink};
pub use redis::{RedisStore, RedisStoreConfig};
