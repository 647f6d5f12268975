use thiserror::Error;

use crate::storage::RepositoryError;

/// Input that fails validation at the API boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be a positive integer, got {value}")]
    NonPositiveId { field: &'static str, value: i64 },
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name too long (max 100 characters)")]
    NameTooLong,
    #[error("Age must be between 1 and 150, got {0}")]
    AgeOutOfRange(i32),
    #[error("Mark value must be between 1 and 10, got {0}")]
    MarkValueOutOfRange(i32),
    #[error("Mark for subject {0} requires the student to be enrolled in that subject")]
    MarkForUnlistedSubject(i64),
    #[error("Invalid sort order: {0} (expected asc or desc)")]
    InvalidSort(String),
    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// Errors returned by the roster services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An entity, or a combination of lookup criteria, did not resolve.
    #[error("{0}")]
    NotFound(String),
    /// A mark was recorded for a subject the student is not enrolled in.
    #[error("Student with id {student_id} is not enrolled in subject with id {subject_id}")]
    SubjectNotAssigned { student_id: i64, subject_id: i64 },
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Not-found error for a single entity looked up by id.
    pub fn not_found_id(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{entity} not found with id: {id}"))
    }

    /// Not-found error for a single entity looked up by name.
    pub fn not_found_name(entity: &str, name: &str) -> Self {
        Self::NotFound(format!("{entity} not found with name: {name}"))
    }

    /// Not-found error listing every id that failed to resolve.
    pub fn not_found_ids(entity: &str, ids: &[i64]) -> Self {
        Self::NotFound(format!("{entity} not found with ids: {ids:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            ServiceError::not_found_id("Student", 5).to_string(),
            "Student not found with id: 5"
        );
        assert_eq!(
            ServiceError::not_found_name("Group", "A-1").to_string(),
            "Group not found with name: A-1"
        );
        assert_eq!(
            ServiceError::not_found_ids("Students", &[3, 7]).to_string(),
            "Students not found with ids: [3, 7]"
        );
    }

    #[test]
    fn test_subject_not_assigned_display() {
        let error = ServiceError::SubjectNotAssigned {
            student_id: 1,
            subject_id: 2,
        };
        assert_eq!(
            error.to_string(),
            "Student with id 1 is not enrolled in subject with id 2"
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let error: ServiceError = ValidationError::EmptyName.into();
        assert_eq!(error.to_string(), "Validation failed: Name cannot be empty");
    }

    #[test]
    fn test_repository_error_is_transparent() {
        let error: ServiceError = RepositoryError::QueryFailed("boom".to_string()).into();
        assert_eq!(error.to_string(), "Query failed: boom");
    }
}
