use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use roster_core::roster::{NameQuery, NewSubject, Subject};

use crate::{
    handlers::{
        extract::{Id, ValidJson, ValidQuery},
        AppError,
    },
    state::AppState,
};

/// List subjects (GET /subjects?name&sort).
pub async fn list_subjects(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<NameQuery>,
) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(state.subjects.list(&query).await?))
}

/// Get a subject by ID (GET /subjects/{id}).
pub async fn get_subject(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(state.subjects.get(id).await?))
}

/// Get a subject by name (GET /subjects/name/{name}).
pub async fn get_subject_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(state.subjects.get_by_name(&name).await?))
}

/// Check whether a subject exists (GET /subjects/exists/{name}).
pub async fn subject_exists(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<bool>, AppError> {
    Ok(Json(state.subjects.exists(&name).await?))
}

/// Create a subject (POST /subjects).
pub async fn create_subject(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewSubject>,
) -> Result<impl IntoResponse, AppError> {
    let subject = state.subjects.create(&payload).await?;

    tracing::info!(subject_id = subject.id, name = %subject.name, "Created new subject");

    Ok((StatusCode::CREATED, Json(subject)))
}

/// Delete a subject by ID (DELETE /subjects/{id}).
pub async fn delete_subject(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    state.subjects.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Delete a subject by name (DELETE /subjects/name/{name}).
pub async fn delete_subject_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.subjects.delete_by_name(&name).await?;
    Ok(StatusCode::OK)
}
