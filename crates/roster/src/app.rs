use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        groups::{
            create_group, delete_group, delete_group_by_name, get_group, get_group_by_name,
            list_groups,
        },
        health::livez,
        marks::{
            create_mark, delete_mark, delete_marks_matching, list_marks, list_marks_by_value,
            student_average, subject_average,
        },
        student_subjects::{
            add_subject, remove_subject, student_with_subjects, students_for_subject,
            subject_with_students, subjects_for_student,
        },
        students::{
            create_student, delete_student, get_student, list_students, list_students_by_group,
            update_student,
        },
        subjects::{
            create_subject, delete_subject, delete_subject_by_name, get_subject,
            get_subject_by_name, list_subjects, subject_exists,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Student routes
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/students/group/{id}", get(list_students_by_group))
        // Group routes
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/{id}", get(get_group).delete(delete_group))
        .route(
            "/groups/name/{name}",
            get(get_group_by_name).delete(delete_group_by_name),
        )
        // Subject routes
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/subjects/{id}", get(get_subject).delete(delete_subject))
        .route(
            "/subjects/name/{name}",
            get(get_subject_by_name).delete(delete_subject_by_name),
        )
        .route("/subjects/exists/{name}", get(subject_exists))
        // Mark routes
        .route(
            "/marks",
            get(list_marks)
                .post(create_mark)
                .delete(delete_marks_matching),
        )
        .route("/marks/{id}", delete(delete_mark))
        .route("/marks/value/{value}", get(list_marks_by_value))
        .route("/marks/average/student/{id}", get(student_average))
        .route("/marks/average/subject/{id}", get(subject_average))
        // Enrollment routes
        .route(
            "/student-subjects",
            post(add_subject).delete(remove_subject),
        )
        .route("/student-subjects/{id}/subjects", get(subjects_for_student))
        .route("/student-subjects/{id}/students", get(students_for_subject))
        .route(
            "/student-subjects/student/{id}/with-subjects",
            get(student_with_subjects),
        )
        .route(
            "/student-subjects/subject/{id}/with-students",
            get(subject_with_students),
        )
        .layer(cors)
        // Probes
        .route("/livez", get(livez))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
