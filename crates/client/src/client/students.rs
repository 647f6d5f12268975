//! Student API operations.

use roster_core::roster::{NewStudent, Student, StudentQuery, StudentUpdate};

use super::RosterClient;
use crate::error::Result;

impl RosterClient {
    /// List students, optionally filtered.
    pub async fn list_students(&self, query: &StudentQuery) -> Result<Vec<Student>> {
        let response = self
            .client
            .get(self.url("/students"))
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get student by ID.
    pub async fn get_student(&self, id: i64) -> Result<Student> {
        let response = self
            .client
            .get(self.url(&format!("/students/{}", id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List the students of a group.
    pub async fn students_by_group(&self, group_id: i64) -> Result<Vec<Student>> {
        let response = self
            .client
            .get(self.url(&format!("/students/group/{}", group_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Create a student with its subjects and marks.
    pub async fn create_student(&self, req: &NewStudent) -> Result<Student> {
        let response = self
            .client
            .post(self.url("/students"))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Update a student's name or age.
    pub async fn update_student(&self, id: i64, req: &StudentUpdate) -> Result<Student> {
        let response = self
            .client
            .put(self.url(&format!("/students/{}", id)))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete student by ID.
    pub async fn delete_student(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/students/{}", id)))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }
}
