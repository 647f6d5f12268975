//! Mark API operations.

use roster_core::roster::{Mark, MarkCriteria, MarkQuery, NewMark};

use super::RosterClient;
use crate::error::Result;

impl RosterClient {
    /// List marks for a student, a subject, both or neither.
    pub async fn list_marks(&self, query: &MarkQuery) -> Result<Vec<Mark>> {
        let response = self
            .client
            .get(self.url("/marks"))
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List marks with an exact value.
    pub async fn marks_by_value(&self, value: i32) -> Result<Vec<Mark>> {
        let response = self
            .client
            .get(self.url(&format!("/marks/value/{}", value)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Average mark of a student. `None` when the student has no marks.
    pub async fn student_average(&self, student_id: i64) -> Result<Option<f64>> {
        let response = self
            .client
            .get(self.url(&format!("/marks/average/student/{}", student_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Average mark of a subject. `None` when the subject has no marks.
    pub async fn subject_average(&self, subject_id: i64) -> Result<Option<f64>> {
        let response = self
            .client
            .get(self.url(&format!("/marks/average/subject/{}", subject_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Record a mark.
    pub async fn create_mark(&self, req: &NewMark) -> Result<Mark> {
        let response = self
            .client
            .post(self.url("/marks"))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete mark by ID.
    pub async fn delete_mark(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/marks/{}", id)))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Delete every mark matching the criteria.
    pub async fn delete_marks_matching(&self, criteria: &MarkCriteria) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/marks"))
            .query(criteria)
            .send()
            .await?;
        self.handle_empty_response(response).await
    }
}
