use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_core::roster::{ServiceError, ValidationError};
use roster_core::storage::{
    repository_error_to_status_code, service_error_to_status_code, RepositoryError,
};

/// Handler error. Wraps any error and picks the status from its kind.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            service_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(err)
        } else if self.0.downcast_ref::<ValidationError>().is_some() {
            400
        } else {
            500
        };

        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = %status_code, error = %self.0, "Request rejected");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_service_errors_map_to_statuses() {
        assert_eq!(
            status_of(ServiceError::not_found_id("Student", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::SubjectNotAssigned {
                student_id: 1,
                subject_id: 2
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ServiceError::from(ValidationError::EmptyName)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_bare_errors_map_to_statuses() {
        assert_eq!(
            status_of(RepositoryError::already_exists("Group", "A-1")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ValidationError::AgeOutOfRange(0)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
