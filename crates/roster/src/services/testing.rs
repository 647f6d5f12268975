//! Service fixture over in-memory storage and cache.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::MemoryCache;
use crate::storage::InMemoryRepository;

use super::{
    CacheLayer, GroupService, MarkService, StudentService, StudentSubjectService, SubjectService,
};

pub(crate) struct Fixture {
    /// Direct storage access, bypassing the cache.
    pub repo: Arc<InMemoryRepository>,
    pub cache: CacheLayer,
    pub students: StudentService,
    pub groups: GroupService,
    pub subjects: SubjectService,
    pub marks: MarkService,
    pub enrollments: StudentSubjectService,
}

impl Fixture {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        let cache = CacheLayer::new(
            Arc::new(MemoryCache::new(1000).expect("non-zero capacity")),
            Duration::from_secs(60),
        );

        let students =
            StudentService::new(repo.clone(), repo.clone(), repo.clone(), cache.clone());
        let groups = GroupService::new(repo.clone(), repo.clone(), cache.clone());
        let subjects = SubjectService::new(repo.clone(), cache.clone());
        let marks = MarkService::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            repo.clone(),
            cache.clone(),
        );
        let enrollments =
            StudentSubjectService::new(repo.clone(), repo.clone(), repo.clone(), cache.clone());

        Self {
            repo,
            cache,
            students,
            groups,
            subjects,
            marks,
            enrollments,
        }
    }
}
