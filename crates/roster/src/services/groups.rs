//! Group service.

use std::sync::Arc;

use roster_core::cache::{
    group_key, group_list_key, group_list_pattern, group_name_key, STUDENTS, STUDENT_SUBJECTS,
};
use roster_core::roster::{find_missing_ids, Group, NameQuery, NewGroup, ServiceError, Validate};
use roster_core::storage::{GroupRepository, StudentRepository};

use super::{timed, CacheLayer, Result};

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    students: Arc<dyn StudentRepository>,
    cache: CacheLayer,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        students: Arc<dyn StudentRepository>,
        cache: CacheLayer,
    ) -> Self {
        Self {
            groups,
            students,
            cache,
        }
    }

    /// Lists groups. A name filter wins over ordering.
    pub async fn list(&self, query: &NameQuery) -> Result<Vec<Group>> {
        timed("read_groups", async {
            tracing::info!(name = ?query.name, sort = ?query.sort, "Fetching groups");

            let key = group_list_key(query);
            if let Some(groups) = self.cache.get::<Vec<Group>>(&key).await {
                return Ok(groups);
            }

            let groups = self.groups.list_groups(query).await?;
            if !groups.is_empty() {
                self.cache.put(&key, &groups).await;
            }
            Ok(groups)
        })
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Group> {
        timed("find_group", async {
            let key = group_key(id);
            if let Some(group) = self.cache.get::<Group>(&key).await {
                return Ok(group);
            }

            let group = self
                .groups
                .get_group(id)
                .await?
                .ok_or_else(|| ServiceError::not_found_id("Group", id))?;
            self.cache.put(&key, &group).await;
            Ok(group)
        })
        .await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Group> {
        timed("find_group_by_name", async {
            let key = group_name_key(name);
            if let Some(group) = self.cache.get::<Group>(&key).await {
                return Ok(group);
            }

            let group = self
                .groups
                .get_group_by_name(name)
                .await?
                .ok_or_else(|| ServiceError::not_found_name("Group", name))?;
            self.cache.put(&key, &group).await;
            Ok(group)
        })
        .await
    }

    /// Creates a group and moves the listed students into it.
    ///
    /// Every student id must exist. Otherwise nothing is written and the
    /// error names each missing id.
    pub async fn create(&self, input: &NewGroup) -> Result<Group> {
        timed("add_group", async {
            tracing::info!(name = %input.name, "Adding new group");
            input.validate()?;

            if !input.student_ids.is_empty() {
                let found: Vec<i64> = self
                    .students
                    .get_students_by_ids(&input.student_ids)
                    .await?
                    .iter()
                    .map(|s| s.id)
                    .collect();
                let missing = find_missing_ids(&input.student_ids, &found);
                if !missing.is_empty() {
                    return Err(ServiceError::not_found_ids("Student", &missing));
                }
            }

            // 1. Persist group and memberships
            let group = self
                .groups
                .create_group(&input.name, &input.student_ids)
                .await?;

            // 2. Canonical keys
            self.cache.put(&group_key(group.id), &group).await;
            self.cache.put(&group_name_key(&group.name), &group).await;

            // 3. Listings, plus the students whose group changed
            self.cache.evict_pattern(&group_list_pattern()).await;
            if !input.student_ids.is_empty() {
                self.cache.evict_region(STUDENTS).await;
                self.cache.evict_region(STUDENT_SUBJECTS).await;
            }

            Ok(group)
        })
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        timed("delete_group", async {
            tracing::info!(group_id = id, "Deleting group");
            let group = self
                .groups
                .get_group(id)
                .await?
                .ok_or_else(|| ServiceError::not_found_id("Group", id))?;

            self.remove(group).await
        })
        .await
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<()> {
        timed("delete_group_by_name", async {
            tracing::info!(name, "Deleting group by name");
            let group = self
                .groups
                .get_group_by_name(name)
                .await?
                .ok_or_else(|| ServiceError::not_found_name("Group", name))?;

            self.remove(group).await
        })
        .await
    }

    async fn remove(&self, group: Group) -> Result<()> {
        self.groups.delete_group(group.id).await?;

        tracing::info!(group_id = group.id, name = %group.name, "Evicting caches for group");
        self.cache.evict(&group_key(group.id)).await;
        self.cache.evict(&group_name_key(&group.name)).await;
        self.cache.evict_pattern(&group_list_pattern()).await;
        // Former members lost their group reference.
        self.cache.evict_region(STUDENTS).await;
        self.cache.evict_region(STUDENT_SUBJECTS).await;

        Ok(())
    }
}
