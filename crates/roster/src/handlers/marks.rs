use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use roster_core::roster::{
    validate_mark_value, Mark, MarkCriteria, MarkQuery, NewMark, ServiceError,
};

use crate::{
    handlers::{
        extract::{Id, ValidJson, ValidQuery},
        AppError,
    },
    state::AppState,
};

/// List marks (GET /marks?studentId&subjectId).
pub async fn list_marks(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<MarkQuery>,
) -> Result<Json<Vec<Mark>>, AppError> {
    Ok(Json(state.marks.list(&query).await?))
}

/// List marks with a given value (GET /marks/value/{value}).
pub async fn list_marks_by_value(
    State(state): State<AppState>,
    Path(value): Path<i32>,
) -> Result<Json<Vec<Mark>>, AppError> {
    validate_mark_value(value).map_err(ServiceError::from)?;
    Ok(Json(state.marks.by_value(value).await?))
}

/// Average mark of a student (GET /marks/average/student/{id}).
///
/// `null` when the student has no marks.
pub async fn student_average(
    State(state): State<AppState>,
    Id(student_id): Id,
) -> Result<Json<Option<f64>>, AppError> {
    Ok(Json(state.marks.student_average(student_id).await?))
}

/// Average mark of a subject (GET /marks/average/subject/{id}).
pub async fn subject_average(
    State(state): State<AppState>,
    Id(subject_id): Id,
) -> Result<Json<Option<f64>>, AppError> {
    Ok(Json(state.marks.subject_average(subject_id).await?))
}

/// Record a mark (POST /marks).
pub async fn create_mark(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewMark>,
) -> Result<impl IntoResponse, AppError> {
    let mark = state.marks.create(&payload).await?;

    tracing::info!(mark_id = mark.id, student_id = mark.student_id, "Created new mark");

    Ok((StatusCode::CREATED, Json(mark)))
}

/// Delete a mark by ID (DELETE /marks/{id}).
pub async fn delete_mark(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    state.marks.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Delete marks by criteria (DELETE /marks?studentId&subjectName&value&id).
pub async fn delete_marks_matching(
    State(state): State<AppState>,
    ValidQuery(criteria): ValidQuery<MarkCriteria>,
) -> Result<StatusCode, AppError> {
    let deleted = state.marks.delete_matching(&criteria).await?;

    tracing::info!(deleted, student_id = criteria.student_id, "Deleted marks");

    Ok(StatusCode::OK)
}
