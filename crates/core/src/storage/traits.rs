use async_trait::async_trait;

use crate::roster::{
    Group, Mark, MarkCriteria, MarkQuery, NameQuery, NewMark, NewStudent, SortOrder, Student,
    Subject,
};

use super::Result;

/// Repository for student operations.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Gets a student by its ID.
    async fn get_student(&self, id: i64) -> Result<Option<Student>>;

    /// Gets every student whose ID is in `ids`. Unknown IDs are skipped.
    async fn get_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>>;

    /// Lists students, optionally filtered by age and ordered by name.
    async fn list_students(
        &self,
        age: Option<i32>,
        sort: Option<SortOrder>,
    ) -> Result<Vec<Student>>;

    /// Gets the students that belong to a group.
    async fn get_students_by_group(&self, group_id: i64) -> Result<Vec<Student>>;

    /// Creates a student in a single transaction.
    ///
    /// The bare student row is written first, then each subject association,
    /// then the attached marks bound to the new student ID.
    async fn create_student(&self, student: &NewStudent) -> Result<Student>;

    /// Overwrites the name and age of an existing student.
    async fn update_student(&self, student: &Student) -> Result<()>;

    /// Detaches the student's subject associations and deletes the student
    /// together with its marks, in a single transaction.
    async fn delete_student(&self, id: i64) -> Result<()>;
}

/// Repository for group operations.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn get_group(&self, id: i64) -> Result<Option<Group>>;

    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>>;

    async fn list_groups(&self, query: &NameQuery) -> Result<Vec<Group>>;

    /// Creates a group and moves the given students into it atomically.
    async fn create_group(&self, name: &str, student_ids: &[i64]) -> Result<Group>;

    /// Deletes a group. Its students are left without a group.
    async fn delete_group(&self, id: i64) -> Result<()>;
}

/// Repository for subject operations.
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn get_subject(&self, id: i64) -> Result<Option<Subject>>;

    async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>>;

    /// Gets every subject whose ID is in `ids`. Unknown IDs are skipped.
    async fn get_subjects_by_ids(&self, ids: &[i64]) -> Result<Vec<Subject>>;

    async fn list_subjects(&self, query: &NameQuery) -> Result<Vec<Subject>>;

    async fn create_subject(&self, name: &str) -> Result<Subject>;

    /// Deletes a subject along with its enrollments and marks.
    async fn delete_subject(&self, id: i64) -> Result<()>;

    async fn subject_exists_by_name(&self, name: &str) -> Result<bool>;
}

/// Repository for mark operations.
#[async_trait]
pub trait MarkRepository: Send + Sync {
    async fn list_marks(&self, query: &MarkQuery) -> Result<Vec<Mark>>;

    async fn get_marks_by_value(&self, value: i32) -> Result<Vec<Mark>>;

    /// Average mark of a student, `None` when the student has no marks.
    async fn average_for_student(&self, student_id: i64) -> Result<Option<f64>>;

    /// Average mark for a subject, `None` when the subject has no marks.
    async fn average_for_subject(&self, subject_id: i64) -> Result<Option<f64>>;

    /// Inserts a mark. Fails with `NotEnrolled` unless the student is enrolled
    /// in the subject at the moment of the write.
    async fn create_mark(&self, mark: &NewMark) -> Result<Mark>;

    /// Deletes a mark by its ID. Fails with `NotFound` if it does not exist.
    async fn delete_mark(&self, id: i64) -> Result<()>;

    /// Deletes the marks matching every given criterion, returning how many
    /// rows were removed.
    async fn delete_marks_matching(&self, criteria: &MarkCriteria) -> Result<u64>;
}

/// Repository for the student to subject enrollment relation.
#[async_trait]
pub trait StudentSubjectRepository: Send + Sync {
    /// Enrolls a student in a subject. Enrolling twice is a no-op.
    async fn add_subject(&self, student_id: i64, subject_id: i64) -> Result<()>;

    /// Removes an enrollment. Removing a missing enrollment is a no-op.
    async fn remove_subject(&self, student_id: i64, subject_id: i64) -> Result<()>;

    async fn has_subject(&self, student_id: i64, subject_id: i64) -> Result<bool>;

    async fn subjects_for_student(&self, student_id: i64) -> Result<Vec<Subject>>;

    async fn students_for_subject(&self, subject_id: i64) -> Result<Vec<Student>>;
}
