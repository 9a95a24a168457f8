use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::store::Store;

/// Thread-safe in-memory store using a HashMap behind a RwLock.
///
/// Entries never expire: a stale entry must stay servable until a refresh
/// replaces it. Contents are lost on restart, so this is suitable for a single
/// process and for tests. Use `RedisStore` when the cache has to survive restarts.
#[derive(Default)]
pub struct HashMapStore {
    state: RwLock<HashMap<String, CacheEntry>>,
}

impl HashMapStore {
    /// Create an empty store.
    pub fn new() -> Self {
        HashMapStore {
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }
}

#[async_trait]
impl Store for HashMapStore {
    fn name(&self) -> &'static str {
        "hashmap"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let state = self.state.read().await;
        Ok(state.get(key).cloned())
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state.insert(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::now_ms;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_put() {
        let store = HashMapStore::new();

        // Initially empty
        let result = store.get("latest_data").await.unwrap();
        assert!(result.is_none());
        assert!(store.is_empty().await);

        let entry = CacheEntry::new(json!({"records": ["a"]}), now_ms());
        store.put("latest_data", entry.clone()).await.unwrap();

        let result = store.get("latest_data").await.unwrap();
        assert_eq!(result, Some(entry));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = HashMapStore::new();

        store
            .put("latest_data", CacheEntry::new(json!({"v": 1}), 1_000))
            .await
            .unwrap();
        // Older timestamp still wins because it was written last.
        store
            .put("latest_data", CacheEntry::new(json!({"v": 2}), 500))
            .await
            .unwrap();

        let result = store.get("latest_data").await.unwrap().unwrap();
        assert_eq!(result.data, json!({"v": 2}));
        assert_eq!(result.timestamp, 500);
        assert_eq!(store.len().await, 1);
    }
}
