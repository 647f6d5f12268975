//! Student service.

use std::sync::Arc;

use roster_core::cache::{
    student_key, student_list_key, student_list_pattern, students_by_group_key, MARKS,
    STUDENT_SUBJECTS,
};
use roster_core::roster::{
    find_missing_ids, NewStudent, ServiceError, Student, StudentQuery, StudentUpdate, Validate,
};
use roster_core::storage::{GroupRepository, StudentRepository, SubjectRepository};

use super::{timed, CacheLayer, Result};

pub struct StudentService {
    students: Arc<dyn StudentRepository>,
    groups: Arc<dyn GroupRepository>,
    subjects: Arc<dyn SubjectRepository>,
    cache: CacheLayer,
}

impl StudentService {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        groups: Arc<dyn GroupRepository>,
        subjects: Arc<dyn SubjectRepository>,
        cache: CacheLayer,
    ) -> Self {
        Self {
            students,
            groups,
            subjects,
            cache,
        }
    }

    /// Resolves a student straight from storage.
    async fn fetch(&self, id: i64) -> Result<Student> {
        self.students
            .get_student(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_id("Student", id))
    }

    /// Lists students, optionally filtered by age and ordered by name.
    ///
    /// An `id` short-circuits to that single student, or `NotFound`.
    pub async fn list(&self, query: &StudentQuery) -> Result<Vec<Student>> {
        timed("read_students", async {
            tracing::info!(age = ?query.age, sort = ?query.sort, id = ?query.id, "Fetching students");

            let key = student_list_key(query.age, query.sort, query.id);
            if let Some(students) = self.cache.get::<Vec<Student>>(&key).await {
                return Ok(students);
            }

            let students = match query.id {
                Some(id) => vec![self.fetch(id).await?],
                None => self.students.list_students(query.age, query.sort).await?,
            };

            if !students.is_empty() {
                self.cache.put(&key, &students).await;
            }
            Ok(students)
        })
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Student> {
        timed("find_student", async {
            let key = student_key(id);
            if let Some(student) = self.cache.get::<Student>(&key).await {
                return Ok(student);
            }

            let student = self.fetch(id).await?;
            self.cache.put(&key, &student).await;
            Ok(student)
        })
        .await
    }

    pub async fn by_group(&self, group_id: i64) -> Result<Vec<Student>> {
        timed("students_by_group", async {
            tracing::info!(group_id, "Fetching students by group");

            let key = students_by_group_key(group_id);
            if let Some(students) = self.cache.get::<Vec<Student>>(&key).await {
                return Ok(students);
            }

            let students = self.students.get_students_by_group(group_id).await?;
            if !students.is_empty() {
                self.cache.put(&key, &students).await;
            }
            Ok(students)
        })
        .await
    }

    /// Creates a student together with its enrollments and marks.
    pub async fn create(&self, input: &NewStudent) -> Result<Student> {
        timed("add_student", async {
            tracing::info!(name = %input.name, "Saving student");
            input.validate()?;

            if let Some(group_id) = input.group_id {
                if self.groups.get_group(group_id).await?.is_none() {
                    return Err(ServiceError::not_found_id("Group", group_id));
                }
            }

            if !input.subject_ids.is_empty() {
                let found: Vec<i64> = self
                    .subjects
                    .get_subjects_by_ids(&input.subject_ids)
                    .await?
                    .iter()
                    .map(|s| s.id)
                    .collect();
                let missing = find_missing_ids(&input.subject_ids, &found);
                if !missing.is_empty() {
                    return Err(ServiceError::not_found_ids("Subject", &missing));
                }
            }

            // 1. Persist student, enrollments and marks
            let student = self.students.create_student(input).await?;

            // 2. Canonical key
            self.cache.put(&student_key(student.id), &student).await;

            // 3. Listings and every view that could now include the student
            self.cache.evict_pattern(&student_list_pattern()).await;
            if let Some(group_id) = student.group_id {
                self.cache.evict(&students_by_group_key(group_id)).await;
            }
            self.cache.evict_region(STUDENT_SUBJECTS).await;
            self.cache.evict_region(MARKS).await;

            tracing::debug!(student_id = student.id, "Student created");
            Ok(student)
        })
        .await
    }

    /// Applies a partial update and returns the stored result.
    pub async fn update(&self, id: i64, update: &StudentUpdate) -> Result<Student> {
        timed("update_student", async {
            tracing::info!(student_id = id, "Updating student");
            update.validate()?;

            let mut student = self.fetch(id).await?;
            if let Some(name) = &update.name {
                student.name = name.clone();
            }
            if let Some(age) = update.age {
                student.age = age;
            }

            self.students.update_student(&student).await?;

            self.cache.evict(&student_key(id)).await;
            self.cache.evict_pattern(&student_list_pattern()).await;
            if let Some(group_id) = student.group_id {
                self.cache.evict(&students_by_group_key(group_id)).await;
            }
            self.cache.evict_region(STUDENT_SUBJECTS).await;

            tracing::debug!(student_id = id, "Student updated");
            Ok(student)
        })
        .await
    }

    /// Deletes a student after detaching its enrollments and marks.
    pub async fn delete(&self, id: i64) -> Result<()> {
        timed("delete_student", async {
            tracing::info!(student_id = id, "Deleting student");
            let student = self.fetch(id).await?;

            self.students.delete_student(id).await?;

            self.cache.evict(&student_key(id)).await;
            self.cache.evict_pattern(&student_list_pattern()).await;
            if let Some(group_id) = student.group_id {
                self.cache.evict(&students_by_group_key(group_id)).await;
            }
            self.cache.evict_region(MARKS).await;
            self.cache.evict_region(STUDENT_SUBJECTS).await;

            tracing::debug!(student_id = id, "Student deleted");
            Ok(())
        })
        .await
    }
}
