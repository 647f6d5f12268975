//! Enrollment endpoints under `/student-subjects`.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use roster_core::roster::{
    validate_positive_id, ServiceError, Student, StudentWithSubjects, Subject,
    SubjectWithStudents, Validate, ValidationError,
};

use crate::{
    handlers::{
        extract::{Id, ValidQuery},
        AppError,
    },
    state::AppState,
};

/// `?studentId&subjectId` for enrollment changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentQuery {
    pub student_id: i64,
    pub subject_id: i64,
}

impl Validate for EnrollmentQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_positive_id("studentId", self.student_id)?;
        validate_positive_id("subjectId", self.subject_id)
    }
}

/// POST /student-subjects?studentId&subjectId
pub async fn add_subject(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<EnrollmentQuery>,
) -> Result<StatusCode, AppError> {
    state
        .enrollments
        .add(query.student_id, query.subject_id)
        .await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /student-subjects?studentId&subjectId
pub async fn remove_subject(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<EnrollmentQuery>,
) -> Result<StatusCode, AppError> {
    state
        .enrollments
        .remove(query.student_id, query.subject_id)
        .await?;
    Ok(StatusCode::OK)
}

/// GET /student-subjects/{studentId}/subjects. An empty set is 404.
pub async fn subjects_for_student(
    State(state): State<AppState>,
    Id(student_id): Id,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = state.enrollments.subjects_for_student(student_id).await?;
    if subjects.is_empty() {
        return Err(ServiceError::NotFound(format!(
            "No subjects found for student with id: {student_id}"
        ))
        .into());
    }
    Ok(Json(subjects))
}

/// GET /student-subjects/{subjectId}/students. An empty set is 404.
pub async fn students_for_subject(
    State(state): State<AppState>,
    Id(subject_id): Id,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.enrollments.students_for_subject(subject_id).await?;
    if students.is_empty() {
        return Err(ServiceError::NotFound(format!(
            "No students found for subject with id: {subject_id}"
        ))
        .into());
    }
    Ok(Json(students))
}

/// GET /student-subjects/student/{studentId}/with-subjects
pub async fn student_with_subjects(
    State(state): State<AppState>,
    Id(student_id): Id,
) -> Result<Json<StudentWithSubjects>, AppError> {
    Ok(Json(
        state.enrollments.student_with_subjects(student_id).await?,
    ))
}

/// GET /student-subjects/subject/{subjectId}/with-students
pub async fn subject_with_students(
    State(state): State<AppState>,
    Id(subject_id): Id,
) -> Result<Json<SubjectWithStudents>, AppError> {
    Ok(Json(
        state.enrollments.subject_with_students(subject_id).await?,
    ))
}
