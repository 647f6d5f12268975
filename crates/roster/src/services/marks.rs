//! Mark service.

use std::sync::Arc;

use roster_core::cache::{
    mark_list_key, marks_by_value_key, student_average_key, subject_average_key, MARKS,
};
use roster_core::roster::{Mark, MarkCriteria, MarkQuery, NewMark, ServiceError, Validate};
use roster_core::storage::{
    MarkRepository, RepositoryError, StudentRepository, StudentSubjectRepository,
    SubjectRepository,
};

use super::{timed, CacheLayer, Result};

pub struct MarkService {
    marks: Arc<dyn MarkRepository>,
    students: Arc<dyn StudentRepository>,
    subjects: Arc<dyn SubjectRepository>,
    enrollments: Arc<dyn StudentSubjectRepository>,
    cache: CacheLayer,
}

impl MarkService {
    pub fn new(
        marks: Arc<dyn MarkRepository>,
        students: Arc<dyn StudentRepository>,
        subjects: Arc<dyn SubjectRepository>,
        enrollments: Arc<dyn StudentSubjectRepository>,
        cache: CacheLayer,
    ) -> Self {
        Self {
            marks,
            students,
            subjects,
            enrollments,
            cache,
        }
    }

    async fn require_student(&self, id: i64) -> Result<()> {
        match self.students.get_student(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found_id("Student", id)),
        }
    }

    async fn require_subject(&self, id: i64) -> Result<()> {
        match self.subjects.get_subject(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found_id("Subject", id)),
        }
    }

    /// Lists marks by student, subject, both, or neither.
    ///
    /// With both ids given, each must resolve.
    pub async fn list(&self, query: &MarkQuery) -> Result<Vec<Mark>> {
        timed("read_marks", async {
            tracing::info!(student_id = ?query.student_id, subject_id = ?query.subject_id, "Fetching marks");

            let key = mark_list_key(query);
            if let Some(marks) = self.cache.get::<Vec<Mark>>(&key).await {
                return Ok(marks);
            }

            if let (Some(student_id), Some(subject_id)) = (query.student_id, query.subject_id) {
                self.require_student(student_id).await?;
                self.require_subject(subject_id).await?;
            }

            let marks = self.marks.list_marks(query).await?;
            if !marks.is_empty() {
                self.cache.put(&key, &marks).await;
            }
            Ok(marks)
        })
        .await
    }

    pub async fn by_value(&self, value: i32) -> Result<Vec<Mark>> {
        timed("marks_by_value", async {
            tracing::info!(value, "Fetching marks by value");

            let key = marks_by_value_key(value);
            if let Some(marks) = self.cache.get::<Vec<Mark>>(&key).await {
                return Ok(marks);
            }

            let marks = self.marks.get_marks_by_value(value).await?;
            if !marks.is_empty() {
                self.cache.put(&key, &marks).await;
            }
            Ok(marks)
        })
        .await
    }

    /// Average of a student's marks, `None` without marks.
    pub async fn student_average(&self, student_id: i64) -> Result<Option<f64>> {
        timed("student_average", async {
            tracing::info!(student_id, "Fetching average mark for student");

            let key = student_average_key(student_id);
            if let Some(average) = self.cache.get::<f64>(&key).await {
                return Ok(Some(average));
            }

            let average = self.marks.average_for_student(student_id).await?;
            if let Some(value) = average {
                self.cache.put(&key, &value).await;
            }
            Ok(average)
        })
        .await
    }

    /// Average of a subject's marks, `None` without marks.
    pub async fn subject_average(&self, subject_id: i64) -> Result<Option<f64>> {
        timed("subject_average", async {
            tracing::info!(subject_id, "Fetching average mark for subject");

            let key = subject_average_key(subject_id);
            if let Some(average) = self.cache.get::<f64>(&key).await {
                return Ok(Some(average));
            }

            let average = self.marks.average_for_subject(subject_id).await?;
            if let Some(value) = average {
                self.cache.put(&key, &value).await;
            }
            Ok(average)
        })
        .await
    }

    /// Records a mark. The student must already be enrolled in the subject.
    pub async fn create(&self, input: &NewMark) -> Result<Mark> {
        timed("add_mark", async {
            tracing::info!(
                student_id = input.student_id,
                subject_id = input.subject_id,
                value = input.value,
                "Adding mark"
            );
            input.validate()?;

            self.require_student(input.student_id).await?;
            self.require_subject(input.subject_id).await?;

            // 1. Enrollment precondition
            if !self
                .enrollments
                .has_subject(input.student_id, input.subject_id)
                .await?
            {
                return Err(ServiceError::SubjectNotAssigned {
                    student_id: input.student_id,
                    subject_id: input.subject_id,
                });
            }

            // 2. Persist; storage re-checks the enrollment in the same write
            let mark = self
                .marks
                .create_mark(input)
                .await
                .map_err(|err| match err {
                    RepositoryError::NotEnrolled {
                        student_id,
                        subject_id,
                    } => ServiceError::SubjectNotAssigned {
                        student_id,
                        subject_id,
                    },
                    other => other.into(),
                })?;

            // 3. Averages and every mark listing are stale
            self.cache.evict(&student_average_key(mark.student_id)).await;
            self.cache.evict(&subject_average_key(mark.subject_id)).await;
            self.cache.evict_region(MARKS).await;

            Ok(mark)
        })
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        timed("delete_mark", async {
            tracing::info!(mark_id = id, "Deleting mark");

            match self.marks.delete_mark(id).await {
                Ok(()) => {}
                Err(RepositoryError::NotFound { .. }) => {
                    return Err(ServiceError::not_found_id("Mark", id))
                }
                Err(err) => return Err(err.into()),
            }

            self.cache.evict_region(MARKS).await;
            Ok(())
        })
        .await
    }

    /// Deletes the marks matching every criterion. Matching nothing is `NotFound`.
    pub async fn delete_matching(&self, criteria: &MarkCriteria) -> Result<u64> {
        timed("delete_marks_matching", async {
            tracing::info!(
                student_id = criteria.student_id,
                subject = %criteria.subject_name,
                value = criteria.value,
                id = ?criteria.id,
                "Deleting specific mark"
            );
            criteria.validate()?;

            let deleted = self.marks.delete_marks_matching(criteria).await?;
            if deleted == 0 {
                return Err(ServiceError::NotFound(
                    "Mark not found with the given criteria".to_string(),
                ));
            }

            self.cache.evict_region(MARKS).await;
            Ok(deleted)
        })
        .await
    }
}

#[cfg(all(test, feature = "inmemory", feature = "memory"))]
mod tests {
    use super::*;
    use crate::services::testing::Fixture;
    use crate::storage::InMemoryRepository;
    use async_trait::async_trait;
    use roster_core::roster::{NewStudent, Student, Subject};
    use roster_core::storage::Result as StorageResult;

    async fn seeded(fx: &Fixture) -> (Student, Subject) {
        let math = fx.repo.create_subject("Math").await.unwrap();
        let ada = fx
            .repo
            .create_student(&NewStudent::new("Ada", 20))
            .await
            .unwrap();
        (ada, math)
    }

    fn new_mark(student: &Student, subject: &Subject, value: i32) -> NewMark {
        NewMark {
            value,
            student_id: student.id,
            subject_id: subject.id,
        }
    }

    #[tokio::test]
    async fn test_create_requires_enrollment() {
        let fx = Fixture::new();
        let (ada, math) = seeded(&fx).await;

        let err = fx
            .marks
            .create(&new_mark(&ada, &math, 9))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::SubjectNotAssigned { student_id, subject_id }
                if student_id == ada.id && subject_id == math.id
        ));

        fx.enrollments.add(ada.id, math.id).await.unwrap();

        let mark = fx.marks.create(&new_mark(&ada, &math, 9)).await.unwrap();
        assert_eq!(mark.value, 9);
    }

    /// Answers "enrolled" and then drops the enrollment, as a concurrent
    /// unenroll landing between the check and the insert would.
    struct UnenrollAfterCheck(Arc<InMemoryRepository>);

    #[async_trait]
    impl StudentSubjectRepository for UnenrollAfterCheck {
        async fn add_subject(&self, student_id: i64, subject_id: i64) -> StorageResult<()> {
            self.0.add_subject(student_id, subject_id).await
        }

        async fn remove_subject(&self, student_id: i64, subject_id: i64) -> StorageResult<()> {
            self.0.remove_subject(student_id, subject_id).await
        }

        async fn has_subject(&self, student_id: i64, subject_id: i64) -> StorageResult<bool> {
            self.0.remove_subject(student_id, subject_id).await?;
            Ok(true)
        }

        async fn subjects_for_student(&self, student_id: i64) -> StorageResult<Vec<Subject>> {
            self.0.subjects_for_student(student_id).await
        }

        async fn students_for_subject(&self, subject_id: i64) -> StorageResult<Vec<Student>> {
            self.0.students_for_subject(subject_id).await
        }
    }

    #[tokio::test]
    async fn test_create_rejects_enrollment_removed_after_check() {
        let fx = Fixture::new();
        let (ada, math) = seeded(&fx).await;
        fx.repo.add_subject(ada.id, math.id).await.unwrap();

        let marks = MarkService::new(
            fx.repo.clone(),
            fx.repo.clone(),
            fx.repo.clone(),
            Arc::new(UnenrollAfterCheck(fx.repo.clone())),
            fx.cache.clone(),
        );

        let err = marks.create(&new_mark(&ada, &math, 9)).await.unwrap_err();

        assert!(matches!(err, ServiceError::SubjectNotAssigned { .. }));
        assert!(!fx.repo.has_subject(ada.id, math.id).await.unwrap());
        assert_eq!(fx.repo.average_for_student(ada.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_with_unknown_student_is_not_found() {
        let fx = Fixture::new();
        let (_, math) = seeded(&fx).await;

        let err = fx
            .marks
            .create(&NewMark {
                value: 5,
                student_id: 77,
                subject_id: math.id,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Student not found with id: 77");
    }

    #[tokio::test]
    async fn test_average_tracks_additions_and_deletions() {
        let fx = Fixture::new();
        let (ada, math) = seeded(&fx).await;
        fx.enrollments.add(ada.id, math.id).await.unwrap();

        assert_eq!(fx.marks.student_average(ada.id).await.unwrap(), None);

        let first = fx.marks.create(&new_mark(&ada, &math, 8)).await.unwrap();
        assert_eq!(fx.marks.student_average(ada.id).await.unwrap(), Some(8.0));
        assert_eq!(fx.marks.subject_average(math.id).await.unwrap(), Some(8.0));

        fx.marks.create(&new_mark(&ada, &math, 4)).await.unwrap();
        assert_eq!(fx.marks.student_average(ada.id).await.unwrap(), Some(6.0));
        assert_eq!(fx.marks.subject_average(math.id).await.unwrap(), Some(6.0));

        fx.marks.delete(first.id).await.unwrap();
        assert_eq!(fx.marks.student_average(ada.id).await.unwrap(), Some(4.0));

        let criteria = MarkCriteria {
            student_id: ada.id,
            subject_name: "Math".to_string(),
            value: 4,
            id: None,
        };
        assert_eq!(fx.marks.delete_matching(&criteria).await.unwrap(), 1);
        assert_eq!(fx.marks.subject_average(math.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_matching_nothing_is_not_found() {
        let fx = Fixture::new();
        let (ada, _) = seeded(&fx).await;

        let err = fx
            .marks
            .delete_matching(&MarkCriteria {
                student_id: ada.id,
                subject_name: "Math".to_string(),
                value: 10,
                id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Mark not found with the given criteria");
    }

    #[tokio::test]
    async fn test_delete_missing_mark_is_not_found() {
        let fx = Fixture::new();

        assert_eq!(
            fx.marks.delete(12).await.unwrap_err().to_string(),
            "Mark not found with id: 12"
        );
    }

    #[tokio::test]
    async fn test_list_with_both_ids_requires_both_to_exist() {
        let fx = Fixture::new();
        let (ada, _) = seeded(&fx).await;

        let err = fx
            .marks
            .list(&MarkQuery {
                student_id: Some(ada.id),
                subject_id: Some(99),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Subject not found with id: 99");

        let only_student = MarkQuery {
            student_id: Some(ada.id),
            subject_id: None,
        };
        assert!(fx.marks.list(&only_student).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_refreshes_after_new_mark() {
        let fx = Fixture::new();
        let (ada, math) = seeded(&fx).await;
        fx.enrollments.add(ada.id, math.id).await.unwrap();
        fx.marks.create(&new_mark(&ada, &math, 7)).await.unwrap();

        assert_eq!(fx.marks.by_value(7).await.unwrap().len(), 1);
        assert_eq!(fx.marks.list(&MarkQuery::default()).await.unwrap().len(), 1);

        fx.marks.create(&new_mark(&ada, &math, 7)).await.unwrap();

        assert_eq!(fx.marks.by_value(7).await.unwrap().len(), 2);
        assert_eq!(fx.marks.list(&MarkQuery::default()).await.unwrap().len(), 2);
    }
}
