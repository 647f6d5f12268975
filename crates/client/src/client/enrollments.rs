//! Student-subject enrollment operations.

use roster_core::roster::{Student, StudentWithSubjects, Subject, SubjectWithStudents};
use serde::Serialize;

use super::RosterClient;
use crate::error::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentParams {
    student_id: i64,
    subject_id: i64,
}

impl RosterClient {
    /// Enroll a student in a subject.
    pub async fn enroll(&self, student_id: i64, subject_id: i64) -> Result<()> {
        let response = self
            .client
            .post(self.url("/student-subjects"))
            .query(&EnrollmentParams {
                student_id,
                subject_id,
            })
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Remove a student from a subject.
    pub async fn unenroll(&self, student_id: i64, subject_id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/student-subjects"))
            .query(&EnrollmentParams {
                student_id,
                subject_id,
            })
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Subjects a student is enrolled in. The server answers 404 when there are none.
    pub async fn subjects_for_student(&self, student_id: i64) -> Result<Vec<Subject>> {
        let response = self
            .client
            .get(self.url(&format!("/student-subjects/{}/subjects", student_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Students enrolled in a subject. The server answers 404 when there are none.
    pub async fn students_for_subject(&self, subject_id: i64) -> Result<Vec<Student>> {
        let response = self
            .client
            .get(self.url(&format!("/student-subjects/{}/students", subject_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn student_with_subjects(&self, student_id: i64) -> Result<StudentWithSubjects> {
        let response = self
            .client
            .get(self.url(&format!(
                "/student-subjects/student/{}/with-subjects",
                student_id
            )))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn subject_with_students(&self, subject_id: i64) -> Result<SubjectWithStudents> {
        let response = self
            .client
            .get(self.url(&format!(
                "/student-subjects/subject/{}/with-students",
                subject_id
            )))
            .send()
            .await?;
        self.handle_response(response).await
    }
}
