//! Validating extractors.
//!
//! Malformed or out-of-range input is rejected with 400 before any
//! service call.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use roster_core::roster::{validate_positive_id, ServiceError, Validate, ValidationError};

use super::AppError;

fn malformed(message: String) -> AppError {
    ServiceError::from(ValidationError::Malformed(message)).into()
}

fn invalid(err: ValidationError) -> AppError {
    ServiceError::from(err).into()
}

/// A single positive integer path parameter.
#[derive(Debug, Clone, Copy)]
pub struct Id(pub i64);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;

        validate_positive_id("id", value).map_err(invalid)?;
        Ok(Id(value))
    }
}

/// Query string deserialized into `T` and validated.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;

        value.validate().map_err(invalid)?;
        Ok(ValidQuery(value))
    }
}

/// JSON body deserialized into `T` and validated.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;

        value.validate().map_err(invalid)?;
        Ok(ValidJson(value))
    }
}
