//! Best-effort access to the cache backend.
//!
//! Cache failures never fail a request: every error is logged and the
//! caller falls back to storage.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use roster_core::cache::{deserialize, region_pattern, serialize, Cache};

/// Cache handle shared by the services.
#[derive(Clone)]
pub struct CacheLayer {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CacheLayer {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Reads and decodes a cached value. Undecodable entries count as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize(&bytes) {
                Ok(value) => {
                    tracing::trace!(key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "Cache deserialization failed");
                    None
                }
            },
            Ok(None) => {
                tracing::trace!(key, "Cache miss");
                None
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache read failed");
                None
            }
        }
    }

    pub async fn put<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T) {
        let bytes = match serialize(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache serialization failed");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, &bytes, Some(self.ttl)).await {
            tracing::warn!(key, error = %err, "Failed to populate cache");
        }
    }

    pub async fn evict(&self, key: &str) {
        if let Err(err) = self.cache.delete(key).await {
            tracing::warn!(key, error = %err, "Failed to evict cache key");
        }
    }

    pub async fn evict_pattern(&self, pattern: &str) {
        if let Err(err) = self.cache.delete_pattern(pattern).await {
            tracing::warn!(pattern, error = %err, "Failed to evict cache pattern");
        }
    }

    /// Evicts every key of a cache region.
    pub async fn evict_region(&self, region: &str) {
        self.evict_pattern(&region_pattern(region)).await;
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use roster_core::cache::{CacheError, Result as CacheResult};

    use crate::cache::MemoryCache;

    /// Cache whose every operation fails.
    struct BrokenCache;

    #[async_trait]
    impl Cache for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn delete_pattern(&self, _pattern: &str) -> CacheResult<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }
    }

    fn layer() -> CacheLayer {
        CacheLayer::new(
            Arc::new(MemoryCache::new(100).unwrap()),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = layer();

        cache.put("subjects:1", &vec![1, 2, 3]).await;

        assert_eq!(cache.get::<Vec<i32>>("subjects:1").await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_a_miss() {
        let cache = layer();

        cache.put("subjects:1", "Math").await;

        assert_eq!(cache.get::<Vec<i32>>("subjects:1").await, None);
    }

    #[tokio::test]
    async fn test_evict_region() {
        let cache = layer();
        cache.put("marks:value-5", &true).await;
        cache.put("groups:1", &true).await;

        cache.evict_region("marks").await;

        assert_eq!(cache.get::<bool>("marks:value-5").await, None);
        assert_eq!(cache.get::<bool>("groups:1").await, Some(true));
    }

    #[tokio::test]
    async fn test_broken_backend_is_swallowed() {
        let cache = CacheLayer::new(Arc::new(BrokenCache), Duration::from_secs(60));

        cache.put("students:1", &1).await;
        cache.evict("students:1").await;
        cache.evict_region("students").await;

        assert_eq!(cache.get::<i32>("students:1").await, None);
    }
}
