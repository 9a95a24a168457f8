//! aqi-cache - A stale-while-revalidate read-through cache for the Taiwan AQI API
//!
//! This library provides:
//! - A freshness policy with a fixed two minute window
//! - Single-flight background refreshes that never block callers
//! - Synchronous fetch only when nothing is cached yet
//! - In-memory and Redis stores behind one `Store` trait
//! - An axum HTTP surface that injects cache metadata into the payload
//!
//! The single-flight guarantee covers one process. Several instances sharing a
//! Redis store each refresh independently.
//!
//! # Example
//!
//! ```ignore
//! use aqi_cache::{FetcherConfig, HashMapStore, HttpFetcher, SwrCache};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(HashMapStore::new());
//!     let fetcher = HttpFetcher::new(FetcherConfig {
//!         api_key: Some("my-key".to_string()),
//!         ..FetcherConfig::default()
//!     })
//!     .unwrap();
//!
//!     let cache = SwrCache::new(store, Arc::new(fetcher));
//!     let served = cache.serve().await.unwrap();
//!     println!("{:?} {}", served.freshness, served.entry.timestamp);
//! }
//! ```

mod coordinator;
mod entry;
mod error;
mod fetcher;
mod policy;
pub mod response;
pub mod server;
mod store;
pub mod stores;
mod swr;
mod utils;

// Re-export public API
pub use coordinator::{RefreshCoordinator, RefreshGuard};
pub use entry::CacheEntry;
pub use error::CacheError;
pub use fetcher::{DEFAULT_UPSTREAM_URL, Fetcher, FetcherConfig, HttpFetcher};
pub use policy::{Classification, FRESH_WINDOW_MS, classify};
pub use store::Store;
pub use stores::memory::HashMapStore;
pub use stores::metrics::{CacheEntryStatus, CacheMetric, MetricsSink, MetricsStore, TracingSink};
pub use stores::redis::{RedisStore, RedisStoreConfig};
pub use swr::{CACHE_KEY, Freshness, Served, SwrCache};
pub use utils::{iso_from_ms, now_ms};
