//! Pure functions for mapping repository and service errors to HTTP status codes.

use super::RepositoryError;
use crate::roster::ServiceError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `NotEnrolled` -> 422 (Unprocessable Entity)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use roster_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::not_found("Group", 7);
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::NotEnrolled { .. } => 422,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// A mark recorded without an enrollment is 422 (Unprocessable Entity): the
/// request is well formed but the relationship it depends on is missing.
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::NotFound(_) => 404,
        ServiceError::SubjectNotAssigned { .. } => 422,
        ServiceError::Validation(_) => 400,
        ServiceError::Repository(inner) => repository_error_to_status_code(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::ValidationError;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::not_found("Student", 1);
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = RepositoryError::already_exists("Group", "A-1");
        assert_eq!(repository_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_not_enrolled_maps_to_422() {
        let error = RepositoryError::NotEnrolled {
            student_id: 1,
            subject_id: 2,
        };
        assert_eq!(repository_error_to_status_code(&error), 422);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("pool closed".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_query_and_serialization_map_to_500() {
        let query = RepositoryError::QueryFailed("syntax error".to_string());
        let serialization = RepositoryError::Serialization("bad row".to_string());
        assert_eq!(repository_error_to_status_code(&query), 500);
        assert_eq!(repository_error_to_status_code(&serialization), 500);
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = RepositoryError::InvalidData("negative age".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_service_errors() {
        assert_eq!(
            service_error_to_status_code(&ServiceError::not_found_id("Mark", 3)),
            404
        );
        assert_eq!(
            service_error_to_status_code(&ServiceError::SubjectNotAssigned {
                student_id: 1,
                subject_id: 2,
            }),
            422
        );
        assert_eq!(
            service_error_to_status_code(&ValidationError::EmptyName.into()),
            400
        );
    }

    #[test]
    fn test_service_error_delegates_repository_status() {
        let error = ServiceError::Repository(RepositoryError::already_exists("Subject", "Art"));
        assert_eq!(service_error_to_status_code(&error), 409);
    }
}
