//! Client error types.

use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status. `message` is the
    /// plain-text body the server sent back.
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ClientError::Api {
            status: 404,
            message: "Student not found with id: 3".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Server returned 404: Student not found with id: 3"
        );
        assert!(error.is_not_found());
    }

    #[test]
    fn test_other_statuses_are_not_not_found() {
        let error = ClientError::Api {
            status: 422,
            message: String::new(),
        };

        assert!(!error.is_not_found());
        assert!(!ClientError::InvalidInput("x".to_string()).is_not_found());
    }
}
