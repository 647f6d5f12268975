//! Application state with cache-aware services.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. Every service holds repository trait objects and a
//! shared cache handle; the concrete backends are chosen via feature flags.

use std::sync::Arc;

use roster_core::cache::Cache;
use roster_core::storage::{
    GroupRepository, MarkRepository, StudentRepository, StudentSubjectRepository,
    SubjectRepository,
};

use crate::config::Config;
use crate::services::{
    CacheLayer, GroupService, MarkService, StudentService, StudentSubjectService, SubjectService,
};

/// A storage backend implementing every roster repository.
pub trait RosterStore:
    StudentRepository
    + GroupRepository
    + SubjectRepository
    + MarkRepository
    + StudentSubjectRepository
    + 'static
{
}

impl<T> RosterStore for T where
    T: StudentRepository
        + GroupRepository
        + SubjectRepository
        + MarkRepository
        + StudentSubjectRepository
        + 'static
{
}

/// Shared application state.
///
/// This is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub students: Arc<StudentService>,
    pub groups: Arc<GroupService>,
    pub subjects: Arc<SubjectService>,
    pub marks: Arc<MarkService>,
    pub enrollments: Arc<StudentSubjectService>,
}

impl AppState {
    /// Wires every service to one store and one cache.
    fn build<R: RosterStore>(store: Arc<R>, cache: Arc<dyn Cache>, config: &Config) -> Self {
        let cache = CacheLayer::new(cache, config.cache_ttl());

        Self {
            students: Arc::new(StudentService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                cache.clone(),
            )),
            groups: Arc::new(GroupService::new(store.clone(), store.clone(), cache.clone())),
            subjects: Arc::new(SubjectService::new(store.clone(), cache.clone())),
            marks: Arc::new(MarkService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                cache.clone(),
            )),
            enrollments: Arc::new(StudentSubjectService::new(
                store.clone(),
                store.clone(),
                store,
                cache,
            )),
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for local runs without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);

            Ok(Self::build(repo, cache, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            Ok(Self::build(repo, cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);

            Ok(Self::build(repo, cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            Ok(Self::build(repo, cache, config))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================
