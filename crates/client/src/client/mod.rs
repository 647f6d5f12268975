//! HTTP client for the roster API.

pub mod enrollments;
pub mod groups;
pub mod health;
pub mod marks;
pub mod students;
pub mod subjects;

use reqwest::Url;

use crate::error::{ClientError, Result};

/// HTTP client for the roster API.
#[derive(Debug, Clone)]
pub struct RosterClient {
    client: reqwest::Client,
    base_url: String,
}

impl RosterClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment (ROSTER_URL or default).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ROSTER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a URL whose last segment is a free-form name, percent-encoded.
    fn named_url(&self, path: &str, name: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.url(path)).map_err(|e| ClientError::InvalidInput(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidInput(format!("{} cannot be a base", self.base_url)))?
            .push(name);
        Ok(url)
    }

    /// Decode a JSON body or turn the response into an API error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(ClientError::from)
    }

    /// Handle responses where no body is expected.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = RosterClient::new("http://localhost:3000/");

        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/students"), "http://localhost:3000/students");
    }

    #[test]
    fn test_named_url_encodes_name() {
        let client = RosterClient::new("http://localhost:3000");

        let url = client.named_url("/groups/name", "A 1/b").unwrap();

        assert_eq!(url.as_str(), "http://localhost:3000/groups/name/A%201%2Fb");
    }

    #[test]
    fn test_named_url_rejects_invalid_base() {
        let client = RosterClient::new("not a url");

        assert!(matches!(
            client.named_url("/subjects/name", "Math"),
            Err(ClientError::InvalidInput(_))
        ));
    }
}
