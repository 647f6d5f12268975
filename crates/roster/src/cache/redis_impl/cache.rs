//! Redis cache implementation.
//!
//! Every key written is also added to a registry Set for its region
//! (`_registry:{region}`), which `delete_pattern` reads instead of SCAN.
//!
//! The registry and the keys are updated with separate commands. A crash in
//! between leaves either a stale registry member (deleting it later is a
//! no-op) or an unregistered key that still expires through its TTL.
//!
//! Members whose key expired are pruned by a server-side script: a small
//! random sample on every `set`, and the whole region on every pattern delete.
//! The script runs atomically, so it never drops a key that is re-set
//! concurrently.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use roster_core::cache::{pattern_matches, region_of, Cache, Result, REGIONS};

use super::error::map_redis_error;

/// Registry members checked for expiry on every `set`.
const PRUNE_SAMPLE: usize = 4;

/// Removes members of `KEYS[1]` whose key no longer exists. `ARGV[1]` is the
/// sample size, or 0 to check every member. Returns how many were removed.
const PRUNE_SCRIPT: &str = r#"
local members
if tonumber(ARGV[1]) > 0 then
    members = redis.call('SRANDMEMBER', KEYS[1], ARGV[1])
else
    members = redis.call('SMEMBERS', KEYS[1])
end
local removed = 0
for _, key in ipairs(members) do
    if redis.call('EXISTS', key) == 0 then
        redis.call('SREM', KEYS[1], key)
        removed = removed + 1
    end
end
return removed
"#;

fn registry_key(region: &str) -> String {
    format!("_registry:{region}")
}

/// Redis cache backend using connection manager for pooling.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    prune: redis::Script,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self {
            conn,
            prune: redis::Script::new(PRUNE_SCRIPT),
        })
    }

    /// Drops expired members from a region's registry. `sample` of 0 checks all.
    async fn prune_registry(&self, registry: &str, sample: usize) -> Result<usize> {
        let mut conn = self.conn.clone();
        let removed: usize = self
            .prune
            .key(registry)
            .arg(sample)
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        if removed > 0 {
            tracing::trace!(registry, removed, "Pruned expired registry members");
        }
        Ok(removed)
    }

    async fn delete_in_region(&self, region: &str, pattern: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let registry = registry_key(region);

        let tracked: Vec<String> = conn.smembers(&registry).await.map_err(map_redis_error)?;
        let matching: Vec<&String> = tracked
            .iter()
            .filter(|key| pattern_matches(pattern, key))
            .collect();

        if !matching.is_empty() {
            conn.del::<_, ()>(&matching).await.map_err(map_redis_error)?;
            conn.srem::<_, _, ()>(&registry, &matching)
                .await
                .map_err(map_redis_error)?;

            tracing::trace!(pattern, removed = matching.len(), "Redis pattern delete");
        }

        self.prune_registry(&registry, 0).await?;
        Ok(())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        if let Some(region) = region_of(key) {
            let registry = registry_key(region);
            conn.sadd::<_, _, ()>(&registry, key)
                .await
                .map_err(map_redis_error)?;
            self.prune_registry(&registry, PRUNE_SAMPLE).await?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;

        if let Some(region) = region_of(key) {
            conn.srem::<_, _, ()>(registry_key(region), key)
                .await
                .map_err(map_redis_error)?;
        }

        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        match region_of(pattern) {
            Some(region) => self.delete_in_region(region, pattern).await,
            None => {
                for region in REGIONS {
                    self.delete_in_region(region, pattern).await?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::cache::{
        student_key, student_list_key, subject_exists_key, STUDENTS, SUBJECTS,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_cache() -> Option<RedisCache> {
        RedisCache::new(&redis_url()).await.ok()
    }

    /// An id no other test run will use.
    fn unique_id() -> i64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        (nanos % i64::MAX as u128) as i64
    }

    #[tokio::test]
    async fn test_redis_set_get_delete() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = student_key(unique_id());

        cache.set(&key, b"ada", None).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"ada".to_vec()));

        cache.delete(&key).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_none());

        let mut conn = cache.conn.clone();
        let tracked: Vec<String> = conn.smembers(registry_key(STUDENTS)).await.unwrap();
        assert!(!tracked.contains(&key));
    }

    #[tokio::test]
    async fn test_redis_ttl() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = student_key(unique_id());

        cache
            .set(&key, b"expiring", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
        cache.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_expired_keys_leave_the_registry() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let id = unique_id();
        let key = subject_exists_key(&format!("gone-{id}"));
        let registry = registry_key(SUBJECTS);
        let mut conn = cache.conn.clone();

        cache
            .set(&key, b"false", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        let tracked: bool = conn.sismember(&registry, &key).await.unwrap();
        assert!(tracked);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        // A pattern delete that does not match the key still prunes it
        cache
            .delete_pattern(&format!("subjects:list:*-{id}"))
            .await
            .unwrap();

        let tracked: bool = conn.sismember(&registry, &key).await.unwrap();
        assert!(!tracked);
    }

    #[tokio::test]
    async fn test_redis_prune_keeps_live_keys() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = subject_exists_key(&format!("kept-{}", unique_id()));
        let registry = registry_key(SUBJECTS);

        cache.set(&key, b"true", None).await.unwrap();
        cache.prune_registry(&registry, 0).await.unwrap();

        let mut conn = cache.conn.clone();
        let tracked: bool = conn.sismember(&registry, &key).await.unwrap();
        assert!(tracked);

        cache.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_delete_pattern_uses_registry() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let id = unique_id();
        let listing = student_list_key(Some(20), None, Some(id));
        let canonical = student_key(id);

        cache.set(&listing, b"[]", None).await.unwrap();
        cache.set(&canonical, b"{}", None).await.unwrap();

        cache
            .delete_pattern(&format!("students:list:*-{id}"))
            .await
            .unwrap();

        assert!(cache.get(&listing).await.unwrap().is_none());
        assert!(cache.get(&canonical).await.unwrap().is_some());

        cache.delete(&canonical).await.unwrap();
    }
}
