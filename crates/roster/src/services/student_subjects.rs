//! Student to subject enrollment service.

use std::sync::Arc;

use roster_core::cache::{
    student_subjects_key, student_with_subjects_key, subject_students_key,
    subject_with_students_key, STUDENTS, STUDENT_SUBJECTS,
};
use roster_core::roster::{
    ServiceError, Student, StudentWithSubjects, Subject, SubjectWithStudents,
};
use roster_core::storage::{StudentRepository, StudentSubjectRepository, SubjectRepository};

use super::{timed, CacheLayer, Result};

pub struct StudentSubjectService {
    enrollments: Arc<dyn StudentSubjectRepository>,
    students: Arc<dyn StudentRepository>,
    subjects: Arc<dyn SubjectRepository>,
    cache: CacheLayer,
}

impl StudentSubjectService {
    pub fn new(
        enrollments: Arc<dyn StudentSubjectRepository>,
        students: Arc<dyn StudentRepository>,
        subjects: Arc<dyn SubjectRepository>,
        cache: CacheLayer,
    ) -> Self {
        Self {
            enrollments,
            students,
            subjects,
            cache,
        }
    }

    async fn student(&self, id: i64) -> Result<Student> {
        self.students
            .get_student(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_id("Student", id))
    }

    async fn subject(&self, id: i64) -> Result<Subject> {
        self.subjects
            .get_subject(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_id("Subject", id))
    }

    async fn evict_relationships(&self) {
        self.cache.evict_region(STUDENT_SUBJECTS).await;
        self.cache.evict_region(STUDENTS).await;
    }

    /// Enrolls a student in a subject. Enrolling twice is a no-op.
    pub async fn add(&self, student_id: i64, subject_id: i64) -> Result<()> {
        timed("add_subject_to_student", async {
            tracing::info!(student_id, subject_id, "Adding subject to student");
            self.student(student_id).await?;
            self.subject(subject_id).await?;

            self.enrollments.add_subject(student_id, subject_id).await?;
            self.evict_relationships().await;

            tracing::info!(student_id, subject_id, "Subject added to student");
            Ok(())
        })
        .await
    }

    /// Removes an enrollment. Marks already recorded for it are kept.
    pub async fn remove(&self, student_id: i64, subject_id: i64) -> Result<()> {
        timed("remove_subject_from_student", async {
            tracing::info!(student_id, subject_id, "Removing subject from student");
            self.student(student_id).await?;
            self.subject(subject_id).await?;

            self.enrollments
                .remove_subject(student_id, subject_id)
                .await?;
            self.evict_relationships().await;

            tracing::info!(student_id, subject_id, "Subject removed from student");
            Ok(())
        })
        .await
    }

    pub async fn subjects_for_student(&self, student_id: i64) -> Result<Vec<Subject>> {
        timed("subjects_by_student", async {
            let key = student_subjects_key(student_id);
            if let Some(subjects) = self.cache.get::<Vec<Subject>>(&key).await {
                return Ok(subjects);
            }

            let subjects = self.enrollments.subjects_for_student(student_id).await?;
            if !subjects.is_empty() {
                self.cache.put(&key, &subjects).await;
            }
            Ok(subjects)
        })
        .await
    }

    pub async fn students_for_subject(&self, subject_id: i64) -> Result<Vec<Student>> {
        timed("students_by_subject", async {
            let key = subject_students_key(subject_id);
            if let Some(students) = self.cache.get::<Vec<Student>>(&key).await {
                return Ok(students);
            }

            self.subject(subject_id).await?;
            let students = self.enrollments.students_for_subject(subject_id).await?;
            if !students.is_empty() {
                self.cache.put(&key, &students).await;
            }
            Ok(students)
        })
        .await
    }

    /// A student with its subjects nested. Cached only when it has subjects.
    pub async fn student_with_subjects(&self, student_id: i64) -> Result<StudentWithSubjects> {
        timed("find_student_with_subjects", async {
            let key = student_with_subjects_key(student_id);
            if let Some(view) = self.cache.get::<StudentWithSubjects>(&key).await {
                return Ok(view);
            }

            let student = self.student(student_id).await?;
            let subjects = self.enrollments.subjects_for_student(student_id).await?;
            let view = StudentWithSubjects { student, subjects };

            if !view.subjects.is_empty() {
                self.cache.put(&key, &view).await;
            }
            Ok(view)
        })
        .await
    }

    /// A subject with its students nested. Cached only when it has students.
    pub async fn subject_with_students(&self, subject_id: i64) -> Result<SubjectWithStudents> {
        timed("find_subject_with_students", async {
            let key = subject_with_students_key(subject_id);
            if let Some(view) = self.cache.get::<SubjectWithStudents>(&key).await {
                return Ok(view);
            }

            let subject = self.subject(subject_id).await?;
            let students = self.enrollments.students_for_subject(subject_id).await?;
            let view = SubjectWithStudents { subject, students };

            if !view.students.is_empty() {
                self.cache.put(&key, &view).await;
            }
            Ok(view)
        })
        .await
    }
}
