//! Health check operations.

use super::RosterClient;
use crate::error::Result;

impl RosterClient {
    /// Check that the server process is alive.
    pub async fn livez(&self) -> Result<()> {
        let response = self.client.get(self.url("/livez")).send().await?;
        self.handle_empty_response(response).await
    }
}
