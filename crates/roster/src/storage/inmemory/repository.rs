//! In-memory repository implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use roster_core::roster::{
    filter_marks, filter_students, find_missing_ids, list_by_name, Group, Mark, MarkCriteria,
    MarkQuery, NameQuery, NewMark, NewStudent, SortOrder, Student, Subject,
};
use roster_core::storage::{
    GroupRepository, MarkRepository, RepositoryError, Result, StudentRepository,
    StudentSubjectRepository, SubjectRepository,
};

#[derive(Debug, Default)]
struct Tables {
    students: BTreeMap<i64, Student>,
    groups: BTreeMap<i64, Group>,
    subjects: BTreeMap<i64, Subject>,
    marks: BTreeMap<i64, Mark>,
    /// (student_id, subject_id) pairs.
    enrollments: BTreeSet<(i64, i64)>,
    last_student_id: i64,
    last_group_id: i64,
    last_subject_id: i64,
    last_mark_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

fn average(values: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, count) = values.fold((0_i64, 0_u32), |(sum, count), v| {
        (sum + i64::from(v), count + 1)
    });
    (count > 0).then(|| sum as f64 / f64::from(count))
}

impl Tables {
    fn subject_id_by_name(&self, name: &str) -> Option<i64> {
        self.subjects
            .values()
            .find(|s| s.name == name)
            .map(|s| s.id)
    }

    fn require_student(&self, id: i64) -> Result<()> {
        if self.students.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::not_found("Student", id))
        }
    }

    fn require_subject(&self, id: i64) -> Result<()> {
        if self.subjects.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::not_found("Subject", id))
        }
    }
}

/// In-memory storage backend.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentRepository for InMemoryRepository {
    async fn get_student(&self, id: i64) -> Result<Option<Student>> {
        let tables = self.tables.read().await;
        Ok(tables.students.get(&id).cloned())
    }

    async fn get_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>> {
        let tables = self.tables.read().await;
        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(ids
            .iter()
            .filter_map(|id| tables.students.get(id).cloned())
            .collect())
    }

    async fn list_students(
        &self,
        age: Option<i32>,
        sort: Option<SortOrder>,
    ) -> Result<Vec<Student>> {
        let tables = self.tables.read().await;
        Ok(filter_students(
            tables.students.values().cloned(),
            age,
            sort,
        ))
    }

    async fn get_students_by_group(&self, group_id: i64) -> Result<Vec<Student>> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .values()
            .filter(|s| s.group_id == Some(group_id))
            .cloned()
            .collect())
    }

    async fn create_student(&self, student: &NewStudent) -> Result<Student> {
        let mut tables = self.tables.write().await;

        if let Some(group_id) = student.group_id {
            if !tables.groups.contains_key(&group_id) {
                return Err(RepositoryError::InvalidData(format!(
                    "group {group_id} does not exist"
                )));
            }
        }
        for subject_id in &student.subject_ids {
            if !tables.subjects.contains_key(subject_id) {
                return Err(RepositoryError::InvalidData(format!(
                    "subject {subject_id} does not exist"
                )));
            }
        }

        let id = next_id(&mut tables.last_student_id);
        let created = Student {
            id,
            name: student.name.clone(),
            age: student.age,
            group_id: student.group_id,
        };
        tables.students.insert(id, created.clone());

        for subject_id in &student.subject_ids {
            tables.enrollments.insert((id, *subject_id));
        }

        for mark in &student.marks {
            let mark_id = next_id(&mut tables.last_mark_id);
            tables.marks.insert(
                mark_id,
                Mark {
                    id: mark_id,
                    value: mark.value,
                    student_id: id,
                    subject_id: mark.subject_id,
                },
            );
        }

        Ok(created)
    }

    async fn update_student(&self, student: &Student) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .students
            .get_mut(&student.id)
            .ok_or_else(|| RepositoryError::not_found("Student", student.id))?;
        stored.name = student.name.clone();
        stored.age = student.age;
        Ok(())
    }

    async fn delete_student(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.require_student(id)?;

        tables.enrollments.retain(|(student_id, _)| *student_id != id);
        tables.marks.retain(|_, mark| mark.student_id != id);
        tables.students.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryRepository {
    async fn get_group(&self, id: i64) -> Result<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.get(&id).cloned())
    }

    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.values().find(|g| g.name == name).cloned())
    }

    async fn list_groups(&self, query: &NameQuery) -> Result<Vec<Group>> {
        let tables = self.tables.read().await;
        Ok(list_by_name(
            tables.groups.values().cloned(),
            query,
            |g| &g.name,
            |g| g.id,
        ))
    }

    async fn create_group(&self, name: &str, student_ids: &[i64]) -> Result<Group> {
        let mut tables = self.tables.write().await;

        if tables.groups.values().any(|g| g.name == name) {
            return Err(RepositoryError::already_exists("Group", name));
        }

        let known: Vec<i64> = tables.students.keys().copied().collect();
        if let Some(missing) = find_missing_ids(student_ids, &known).first() {
            return Err(RepositoryError::not_found("Student", missing));
        }

        let id = next_id(&mut tables.last_group_id);
        let group = Group::new(id, name);
        tables.groups.insert(id, group.clone());

        for student_id in student_ids {
            if let Some(student) = tables.students.get_mut(student_id) {
                student.group_id = Some(id);
            }
        }

        Ok(group)
    }

    async fn delete_group(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.groups.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Group", id));
        }

        for student in tables.students.values_mut() {
            if student.group_id == Some(id) {
                student.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for InMemoryRepository {
    async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        let tables = self.tables.read().await;
        Ok(tables.subjects.get(&id).cloned())
    }

    async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>> {
        let tables = self.tables.read().await;
        Ok(tables.subjects.values().find(|s| s.name == name).cloned())
    }

    async fn get_subjects_by_ids(&self, ids: &[i64]) -> Result<Vec<Subject>> {
        let tables = self.tables.read().await;
        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(ids
            .iter()
            .filter_map(|id| tables.subjects.get(id).cloned())
            .collect())
    }

    async fn list_subjects(&self, query: &NameQuery) -> Result<Vec<Subject>> {
        let tables = self.tables.read().await;
        Ok(list_by_name(
            tables.subjects.values().cloned(),
            query,
            |s| &s.name,
            |s| s.id,
        ))
    }

    async fn create_subject(&self, name: &str) -> Result<Subject> {
        let mut tables = self.tables.write().await;

        if tables.subject_id_by_name(name).is_some() {
            return Err(RepositoryError::already_exists("Subject", name));
        }

        let id = next_id(&mut tables.last_subject_id);
        let subject = Subject::new(id, name);
        tables.subjects.insert(id, subject.clone());
        Ok(subject)
    }

    async fn delete_subject(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.require_subject(id)?;

        tables.enrollments.retain(|(_, subject_id)| *subject_id != id);
        tables.marks.retain(|_, mark| mark.subject_id != id);
        tables.subjects.remove(&id);
        Ok(())
    }

    async fn subject_exists_by_name(&self, name: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.subject_id_by_name(name).is_some())
    }
}

#[async_trait]
impl MarkRepository for InMemoryRepository {
    async fn list_marks(&self, query: &MarkQuery) -> Result<Vec<Mark>> {
        let tables = self.tables.read().await;
        Ok(filter_marks(tables.marks.values().cloned(), query))
    }

    async fn get_marks_by_value(&self, value: i32) -> Result<Vec<Mark>> {
        let tables = self.tables.read().await;
        Ok(tables
            .marks
            .values()
            .filter(|m| m.value == value)
            .cloned()
            .collect())
    }

    async fn average_for_student(&self, student_id: i64) -> Result<Option<f64>> {
        let tables = self.tables.read().await;
        Ok(average(
            tables
                .marks
                .values()
                .filter(|m| m.student_id == student_id)
                .map(|m| m.value),
        ))
    }

    async fn average_for_subject(&self, subject_id: i64) -> Result<Option<f64>> {
        let tables = self.tables.read().await;
        Ok(average(
            tables
                .marks
                .values()
                .filter(|m| m.subject_id == subject_id)
                .map(|m| m.value),
        ))
    }

    async fn create_mark(&self, mark: &NewMark) -> Result<Mark> {
        let mut tables = self.tables.write().await;

        if !tables.students.contains_key(&mark.student_id)
            || !tables.subjects.contains_key(&mark.subject_id)
        {
            return Err(RepositoryError::InvalidData(format!(
                "mark references unknown student {} or subject {}",
                mark.student_id, mark.subject_id
            )));
        }
        if !tables
            .enrollments
            .contains(&(mark.student_id, mark.subject_id))
        {
            return Err(RepositoryError::NotEnrolled {
                student_id: mark.student_id,
                subject_id: mark.subject_id,
            });
        }

        let id = next_id(&mut tables.last_mark_id);
        let created = Mark {
            id,
            value: mark.value,
            student_id: mark.student_id,
            subject_id: mark.subject_id,
        };
        tables.marks.insert(id, created.clone());
        Ok(created)
    }

    async fn delete_mark(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .marks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("Mark", id))
    }

    async fn delete_marks_matching(&self, criteria: &MarkCriteria) -> Result<u64> {
        let mut tables = self.tables.write().await;

        let Some(subject_id) = tables.subject_id_by_name(&criteria.subject_name) else {
            return Ok(0);
        };

        let before = tables.marks.len();
        tables.marks.retain(|_, mark| {
            let matches = mark.student_id == criteria.student_id
                && mark.subject_id == subject_id
                && mark.value == criteria.value
                && criteria.id.is_none_or(|id| mark.id == id);
            !matches
        });
        Ok((before - tables.marks.len()) as u64)
    }
}

#[async_trait]
impl StudentSubjectRepository for InMemoryRepository {
    async fn add_subject(&self, student_id: i64, subject_id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.require_student(student_id)?;
        tables.require_subject(subject_id)?;
        tables.enrollments.insert((student_id, subject_id));
        Ok(())
    }

    async fn remove_subject(&self, student_id: i64, subject_id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.enrollments.remove(&(student_id, subject_id));
        Ok(())
    }

    async fn has_subject(&self, student_id: i64, subject_id: i64) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.enrollments.contains(&(student_id, subject_id)))
    }

    async fn subjects_for_student(&self, student_id: i64) -> Result<Vec<Subject>> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .filter(|(sid, _)| *sid == student_id)
            .filter_map(|(_, subject_id)| tables.subjects.get(subject_id).cloned())
            .collect())
    }

    async fn students_for_subject(&self, subject_id: i64) -> Result<Vec<Student>> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .filter(|(_, sid)| *sid == subject_id)
            .filter_map(|(student_id, _)| tables.students.get(student_id).cloned())
            .collect())
    }
}
