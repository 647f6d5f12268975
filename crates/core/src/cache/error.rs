use thiserror::Error;

use super::SerializationError;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let error = CacheError::ConnectionFailed("refused".to_string());
        assert_eq!(error.to_string(), "Cache connection failed: refused");
    }

    #[test]
    fn test_operation_failed_display() {
        let error = CacheError::OperationFailed("capacity must be non-zero".to_string());
        assert_eq!(
            error.to_string(),
            "Cache operation failed: capacity must be non-zero"
        );
    }

    #[test]
    fn test_from_serialization_error() {
        let error: CacheError = SerializationError::DeserializeFailed("EOF".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Serialization error: Failed to deserialize: EOF"
        );
    }
}
