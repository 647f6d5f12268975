//! Subject API operations.

use roster_core::roster::{NameQuery, NewSubject, Subject};

use super::RosterClient;
use crate::error::Result;

impl RosterClient {
    /// List subjects, filtered by name or sorted.
    pub async fn list_subjects(&self, query: &NameQuery) -> Result<Vec<Subject>> {
        let response = self
            .client
            .get(self.url("/subjects"))
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get subject by ID.
    pub async fn get_subject(&self, id: i64) -> Result<Subject> {
        let response = self
            .client
            .get(self.url(&format!("/subjects/{}", id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get subject by its unique name.
    pub async fn get_subject_by_name(&self, name: &str) -> Result<Subject> {
        let url = self.named_url("/subjects/name", name)?;
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Whether a subject with this name exists.
    pub async fn subject_exists(&self, name: &str) -> Result<bool> {
        let url = self.named_url("/subjects/exists", name)?;
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Create a new subject.
    pub async fn create_subject(&self, req: &NewSubject) -> Result<Subject> {
        let response = self
            .client
            .post(self.url("/subjects"))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete subject by ID.
    pub async fn delete_subject(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/subjects/{}", id)))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Delete subject by name.
    pub async fn delete_subject_by_name(&self, name: &str) -> Result<()> {
        let url = self.named_url("/subjects/name", name)?;
        let response = self.client.delete(url).send().await?;
        self.handle_empty_response(response).await
    }
}
