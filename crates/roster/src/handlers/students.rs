use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use roster_core::roster::{NewStudent, Student, StudentQuery, StudentUpdate};

use crate::{
    handlers::{
        extract::{Id, ValidJson, ValidQuery},
        AppError,
    },
    state::AppState,
};

/// List students (GET /students?age&sort&id).
pub async fn list_students(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<StudentQuery>,
) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(state.students.list(&query).await?))
}

/// Get a student by ID (GET /students/{id}).
pub async fn get_student(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.students.get(id).await?))
}

/// List the members of a group (GET /students/group/{groupId}).
pub async fn list_students_by_group(
    State(state): State<AppState>,
    Id(group_id): Id,
) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(state.students.by_group(group_id).await?))
}

/// Create a student (POST /students).
pub async fn create_student(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.students.create(&payload).await?;

    tracing::info!(student_id = student.id, name = %student.name, "Created new student");

    Ok((StatusCode::CREATED, Json(student)))
}

/// Update a student's name and/or age (PUT /students/{id}).
pub async fn update_student(
    State(state): State<AppState>,
    Id(id): Id,
    ValidJson(payload): ValidJson<StudentUpdate>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.students.update(id, &payload).await?))
}

/// Delete a student (DELETE /students/{id}).
pub async fn delete_student(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    state.students.delete(id).await?;

    tracing::info!(student_id = id, "Deleted student");

    Ok(StatusCode::OK)
}
