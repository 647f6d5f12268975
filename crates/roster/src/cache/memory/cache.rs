//! In-memory cache implementation with LRU eviction.
//!
//! Keys are tracked per region (the text before the first `:`) so that
//! region-scoped patterns like `"marks:*"` only scan keys of that region.
//! Patterns without a literal region fall back to a full scan.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use roster_core::cache::{pattern_matches, region_of, Cache, CacheError, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Store and region registry, guarded together so they never disagree.
#[derive(Debug)]
struct Inner {
    store: LruCache<String, CacheEntry>,
    regions: HashMap<String, HashSet<String>>,
}

impl Inner {
    fn track(&mut self, key: &str) {
        if let Some(region) = region_of(key) {
            self.regions
                .entry(region.to_string())
                .or_default()
                .insert(key.to_string());
        }
    }

    fn untrack(&mut self, key: &str) {
        let Some(region) = region_of(key) else {
            return;
        };
        if let Some(keys) = self.regions.get_mut(region) {
            keys.remove(key);
            if keys.is_empty() {
                self.regions.remove(region);
            }
        }
    }

    fn remove(&mut self, key: &str) {
        self.store.pop(key);
        self.untrack(key);
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// TTL expiry is lazy: an expired entry is dropped the next time it is read.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` values.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::OperationFailed` if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(max_entries).ok_or_else(|| {
            CacheError::OperationFailed("max_entries must be greater than 0".to_string())
        })?;

        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                store: LruCache::new(capacity),
                regions: HashMap::new(),
            })),
        })
    }

    /// Number of keys currently tracked for a region.
    #[cfg(test)]
    async fn tracked_in(&self, region: &str) -> usize {
        let inner = self.inner.read().await;
        inner.regions.get(region).map_or(0, HashSet::len)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.inner.write().await;

        let expired = match inner.store.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => return Ok(Some(entry.value.clone())),
            None => return Ok(None),
        };

        if expired {
            inner.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut inner = self.inner.write().await;
        let entry = CacheEntry::new(value.to_vec(), ttl);

        if let Some((evicted, _)) = inner.store.push(key.to_string(), entry) {
            if evicted != key {
                inner.untrack(&evicted);
            }
        }
        inner.track(key);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.write().await.remove(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let mut inner = self.inner.write().await;

        let candidates: Vec<String> = match region_of(pattern) {
            Some(region) => inner
                .regions
                .get(region)
                .map(|keys| keys.iter().cloned().collect())
                .unwrap_or_default(),
            None => inner.store.iter().map(|(key, _)| key.clone()).collect(),
        };

        let matching: Vec<String> = candidates
            .into_iter()
            .filter(|key| pattern_matches(pattern, key))
            .collect();

        tracing::trace!(pattern, removed = matching.len(), "Cache pattern delete");

        for key in &matching {
            inner.remove(key);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::cache::{
        group_key, group_list_key, group_list_pattern, mark_list_key, region_pattern,
        student_average_key, student_key, GROUPS, MARKS,
    };
    use roster_core::roster::{MarkQuery, NameQuery};

    const TEST_MAX_ENTRIES: usize = 1000;

    fn cache() -> MemoryCache {
        MemoryCache::new(TEST_MAX_ENTRIES).unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = cache();

        cache.set("students:1", b"ada", None).await.unwrap();

        assert_eq!(
            cache.get("students:1").await.unwrap(),
            Some(b"ada".to_vec())
        );
        assert_eq!(cache.get("students:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_untracks_key() {
        let cache = cache();
        let key = group_key(1);

        cache.set(&key, b"A-1", None).await.unwrap();
        assert_eq!(cache.tracked_in(GROUPS).await, 1);

        cache.delete(&key).await.unwrap();

        assert!(cache.get(&key).await.unwrap().is_none());
        assert_eq!(cache.tracked_in(GROUPS).await, 0);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = cache();
        let key = student_key(9);

        cache
            .set(&key, b"short-lived", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
        assert_eq!(cache.tracked_in("students").await, 0);
    }

    #[tokio::test]
    async fn test_delete_listing_pattern_keeps_canonical_keys() {
        let cache = cache();
        let listing = group_list_key(&NameQuery::default());

        cache.set(&listing, b"[]", None).await.unwrap();
        cache.set(&group_key(1), b"{}", None).await.unwrap();

        cache.delete_pattern(&group_list_pattern()).await.unwrap();

        assert!(cache.get(&listing).await.unwrap().is_none());
        assert!(cache.get(&group_key(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_region_leaves_other_regions() {
        let cache = cache();

        cache
            .set(&mark_list_key(&MarkQuery::default()), b"[]", None)
            .await
            .unwrap();
        cache.set(&student_average_key(1), b"7.5", None).await.unwrap();
        cache.set(&student_key(1), b"{}", None).await.unwrap();

        cache.delete_pattern(&region_pattern(MARKS)).await.unwrap();

        assert!(cache.get(&student_average_key(1)).await.unwrap().is_none());
        assert_eq!(cache.tracked_in(MARKS).await, 0);
        assert!(cache.get(&student_key(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pattern_without_region_scans_everything() {
        let cache = cache();

        cache.set("students:list:1", b"a", None).await.unwrap();
        cache.set("groups:list:1", b"b", None).await.unwrap();
        cache.set("groups:1", b"c", None).await.unwrap();

        cache.delete_pattern("*:list:*").await.unwrap();

        assert!(cache.get("students:list:1").await.unwrap().is_none());
        assert!(cache.get("groups:list:1").await.unwrap().is_none());
        assert!(cache.get("groups:1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_value() {
        let cache = cache();

        cache.set("subjects:1", b"first", None).await.unwrap();
        cache.set("subjects:1", b"second", None).await.unwrap();

        assert_eq!(
            cache.get("subjects:1").await.unwrap(),
            Some(b"second".to_vec())
        );
        assert_eq!(cache.tracked_in("subjects").await, 1);
    }

    #[tokio::test]
    async fn test_lru_eviction_untracks_evicted_key() {
        let cache = MemoryCache::new(3).unwrap();

        cache.set("marks:1", b"1", None).await.unwrap();
        cache.set("marks:2", b"2", None).await.unwrap();
        cache.set("marks:3", b"3", None).await.unwrap();

        // Touch marks:1 so marks:2 becomes least recently used.
        cache.get("marks:1").await.unwrap();
        cache.set("marks:4", b"4", None).await.unwrap();

        assert!(cache.get("marks:1").await.unwrap().is_some());
        assert!(cache.get("marks:2").await.unwrap().is_none());
        assert!(cache.get("marks:4").await.unwrap().is_some());
        assert_eq!(cache.tracked_in(MARKS).await, 3);
    }

    #[test]
    fn test_zero_max_entries_is_rejected() {
        assert!(matches!(
            MemoryCache::new(0),
            Err(CacheError::OperationFailed(_))
        ));
    }
}
