//! Group API operations.

use roster_core::roster::{Group, NameQuery, NewGroup};

use super::RosterClient;
use crate::error::Result;

impl RosterClient {
    /// List groups, filtered by name or sorted.
    pub async fn list_groups(&self, query: &NameQuery) -> Result<Vec<Group>> {
        let response = self
            .client
            .get(self.url("/groups"))
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get group by ID.
    pub async fn get_group(&self, id: i64) -> Result<Group> {
        let response = self
            .client
            .get(self.url(&format!("/groups/{}", id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get group by its unique name.
    pub async fn get_group_by_name(&self, name: &str) -> Result<Group> {
        let url = self.named_url("/groups/name", name)?;
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Create a group, moving the given students into it.
    pub async fn create_group(&self, req: &NewGroup) -> Result<Group> {
        let response = self
            .client
            .post(self.url("/groups"))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete group by ID.
    pub async fn delete_group(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/groups/{}", id)))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Delete group by name.
    pub async fn delete_group_by_name(&self, name: &str) -> Result<()> {
        let url = self.named_url("/groups/name", name)?;
        let response = self.client.delete(url).send().await?;
        self.handle_empty_response(response).await
    }
}
