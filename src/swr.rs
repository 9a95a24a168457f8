use serde::Serialize;
use std::sync::Arc;

use crate::coordinator::RefreshCoordinator;
use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::fetcher::Fetcher;
use crate::policy::classify;
use crate::store::Store;
use crate::utils::now_ms;

/// The single key the whole dataset lives under.
pub const CACHE_KEY: &str = "latest_data";

/// Freshness tag reported to the caller alongside the served entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Inside the freshness window, or fetched synchronously for this request.
    Fresh,
    /// Past the window; a refresh started by an earlier request is still running.
    Recent,
    /// Past the window; this request started a background refresh.
    Stale,
}

impl Freshness {
    pub fn as_str(self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Recent => "recent",
            Freshness::Stale => "stale",
        }
    }
}

/// Outcome of one read-through request.
#[derive(Debug, Clone, PartialEq)]
pub struct Served {
    pub entry: CacheEntry,
    pub freshness: Freshness,
}

/// Read-through cache with stale-while-revalidate semantics.
///
/// - If the entry is fresh, return it immediately
/// - If the entry is stale, return it and refresh in the background
/// - If there is no entry, fetch from upstream and wait for it
#[derive(Clone)]
pub struct SwrCache {
    store: Arc<dyn Store>,
    coordinator: RefreshCoordinator,
    key: String,
}

impl SwrCache {
    /// Create a cache reading from `store` and refreshing through `fetcher`.
    pub fn new(store: Arc<dyn Store>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_key(store, fetcher, CACHE_KEY)
    }

    /// Same as [`SwrCache::new`] with a custom store key.
    pub fn with_key(store: Arc<dyn Store>, fetcher: Arc<dyn Fetcher>, key: &str) -> Self {
        let coordinator = RefreshCoordinator::new(store.clone(), fetcher, key);
        SwrCache {
            store,
            coordinator,
            key: key.to_string(),
        }
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Serve the current dataset.
    ///
    /// Store failures always propagate. Upstream failures propagate only when
    /// there was nothing cached to fall back on.
    pub async fn serve(&self) -> Result<Served, CacheError> {
        let cached = self.store.get(&self.key).await?;
        let now = now_ms();
        let classification = classify(cached.as_ref().map(|e| e.timestamp), now);

        let served = match cached {
            Some(entry) if classification.needs_refresh() => {
                let freshness = if self.coordinator.maybe_refresh_in_background() {
                    Freshness::Stale
                } else {
                    Freshness::Recent
                };
                Served { entry, freshness }
            }
            Some(entry) => Served {
                entry,
                freshness: Freshness::Fresh,
            },
            None => {
                let entry = self.coordinator.refresh_now().await.inspect_err(|err| {
                    tracing::error!(key = %self.key, error = %err, "synchronous refresh failed");
                })?;
                Served {
                    entry,
                    freshness: Freshness::Fresh,
                }
            }
        };

        tracing::debug!(
            key = %self.key,
            freshness = served.freshness.as_str(),
            age_ms = served.entry.age_ms(now).max(0),
            "serving cached dataset"
        );
        Ok(served)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FRESH_WINDOW_MS;
    use crate::stores::memory::HashMapStore;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch_fresh_data(&self) -> Result<Value, CacheError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"fields": [], "records": ["new"]}))
        }
    }

    fn setup() -> (Arc<HashMapStore>, Arc<CountingFetcher>, SwrCache) {
        let store = Arc::new(HashMapStore::new());
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
        });
        let cache = SwrCache::new(store.clone(), fetcher.clone());
        (store, fetcher, cache)
    }

    #[test]
    fn test_freshness_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Freshness::Stale).unwrap(), json!("stale"));
        assert_eq!(serde_json::to_value(Freshness::Recent).unwrap(), json!("recent"));
        assert_eq!(Freshness::Fresh.as_str(), "fresh");
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_synchronously() {
        let (store, fetcher, cache) = setup();

        let served = cache.serve().await.unwrap();

        assert_eq!(served.freshness, Freshness::Fresh);
        assert_eq!(served.entry.data, json!({"fields": [], "records": ["new"]}));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(CACHE_KEY).await.unwrap(), Some(served.entry));
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_fetch() {
        let (store, fetcher, cache) = setup();
        let entry = CacheEntry::new(json!({"records": ["old"]}), now_ms() - 1_000);
        store.put(CACHE_KEY, entry.clone()).await.unwrap();

        let served = cache.serve().await.unwrap();

        assert_eq!(served.freshness, Freshness::Fresh);
        assert_eq!(served.entry, entry);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(!cache.coordinator().is_refreshing());
    }

    #[tokio::test]
    async fn test_stale_entry_is_served_and_refreshed() {
        let (store, fetcher, cache) = setup();
        let entry = CacheEntry::new(json!({"records": ["old"]}), now_ms() - FRESH_WINDOW_MS - 30_000);
        store.put(CACHE_KEY, entry.clone()).await.unwrap();

        let served = cache.serve().await.unwrap();
        assert_eq!(served.freshness, Freshness::Stale);
        assert_eq!(served.entry, entry);

        cache.coordinator().tasks().close();
        cache.coordinator().tasks().wait().await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        let refreshed = store.get(CACHE_KEY).await.unwrap().unwrap();
        assert_eq!(refreshed.data, json!({"fields": [], "records": ["new"]}));
        assert!(refreshed.timestamp > entry.timestamp);
    }

    #[tokio::test]
    async fn test_minimum_timestamp_is_served_stale_and_replaced() {
        let (store, fetcher, cache) = setup();
        let entry = CacheEntry::from_json(r#"{"timestamp":-9223372036854775808,"data":{"records":["old"]}}"#).unwrap();
        store.put(CACHE_KEY, entry.clone()).await.unwrap();

        let served = cache.serve().await.unwrap();
        assert_eq!(served.freshness, Freshness::Stale);
        assert_eq!(served.entry, entry);

        cache.coordinator().tasks().close();
        cache.coordinator().tasks().wait().await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        let refreshed = store.get(CACHE_KEY).await.unwrap().unwrap();
        assert_eq!(refreshed.data, json!({"fields": [], "records": ["new"]}));
    }
}
