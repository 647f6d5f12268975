//! Subject service.

use std::sync::Arc;

use roster_core::cache::{
    subject_exists_key, subject_key, subject_list_key, subject_list_pattern, subject_name_key,
    MARKS, STUDENT_SUBJECTS,
};
use roster_core::roster::{NameQuery, NewSubject, ServiceError, Subject, Validate};
use roster_core::storage::SubjectRepository;

use super::{timed, CacheLayer, Result};

pub struct SubjectService {
    subjects: Arc<dyn SubjectRepository>,
    cache: CacheLayer,
}

impl SubjectService {
    pub fn new(subjects: Arc<dyn SubjectRepository>, cache: CacheLayer) -> Self {
        Self { subjects, cache }
    }

    pub async fn list(&self, query: &NameQuery) -> Result<Vec<Subject>> {
        timed("read_subjects", async {
            tracing::info!(name = ?query.name, sort = ?query.sort, "Fetching subjects");

            let key = subject_list_key(query);
            if let Some(subjects) = self.cache.get::<Vec<Subject>>(&key).await {
                return Ok(subjects);
            }

            let subjects = self.subjects.list_subjects(query).await?;
            if !subjects.is_empty() {
                self.cache.put(&key, &subjects).await;
            }
            Ok(subjects)
        })
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Subject> {
        timed("find_subject", async {
            let key = subject_key(id);
            if let Some(subject) = self.cache.get::<Subject>(&key).await {
                return Ok(subject);
            }

            let subject = self
                .subjects
                .get_subject(id)
                .await?
                .ok_or_else(|| ServiceError::not_found_id("Subject", id))?;
            self.cache.put(&key, &subject).await;
            Ok(subject)
        })
        .await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Subject> {
        timed("find_subject_by_name", async {
            let key = subject_name_key(name);
            if let Some(subject) = self.cache.get::<Subject>(&key).await {
                return Ok(subject);
            }

            let subject = self
                .subjects
                .get_subject_by_name(name)
                .await?
                .ok_or_else(|| ServiceError::not_found_name("Subject", name))?;
            self.cache.put(&key, &subject).await;
            Ok(subject)
        })
        .await
    }

    /// Whether a subject with this exact name exists. Both answers are cached.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        timed("subject_exists", async {
            let key = subject_exists_key(name);
            if let Some(exists) = self.cache.get::<bool>(&key).await {
                return Ok(exists);
            }

            let exists = self.subjects.subject_exists_by_name(name).await?;
            self.cache.put(&key, &exists).await;
            Ok(exists)
        })
        .await
    }

    pub async fn create(&self, input: &NewSubject) -> Result<Subject> {
        timed("add_subject", async {
            tracing::info!(name = %input.name, "Adding subject");
            input.validate()?;

            // 1. Persist
            let subject = self.subjects.create_subject(&input.name).await?;

            // 2. Canonical keys
            self.cache.put(&subject_key(subject.id), &subject).await;
            self.cache.put(&subject_name_key(&subject.name), &subject).await;

            // 3. A cached "does not exist" answer and every listing are now stale
            self.cache.evict(&subject_exists_key(&subject.name)).await;
            self.cache.evict_pattern(&subject_list_pattern()).await;

            Ok(subject)
        })
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        timed("delete_subject", async {
            tracing::info!(subject_id = id, "Deleting subject");
            let subject = self
                .subjects
                .get_subject(id)
                .await?
                .ok_or_else(|| ServiceError::not_found_id("Subject", id))?;

            self.remove(subject).await
        })
        .await
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<()> {
        timed("delete_subject_by_name", async {
            tracing::info!(name, "Deleting subject by name");
            let subject = self
                .subjects
                .get_subject_by_name(name)
                .await?
                .ok_or_else(|| ServiceError::not_found_name("Subject", name))?;

            self.remove(subject).await
        })
        .await
    }

    /// Deletes the subject with its enrollments and marks.
    async fn remove(&self, subject: Subject) -> Result<()> {
        self.subjects.delete_subject(subject.id).await?;

        self.cache.evict(&subject_key(subject.id)).await;
        self.cache.evict(&subject_name_key(&subject.name)).await;
        self.cache.evict(&subject_exists_key(&subject.name)).await;
        self.cache.evict_pattern(&subject_list_pattern()).await;
        self.cache.evict_region(MARKS).await;
        self.cache.evict_region(STUDENT_SUBJECTS).await;

        tracing::debug!(subject_id = subject.id, "Subject deleted");
        Ok(())
    }
}
