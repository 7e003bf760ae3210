//! HTTP client for the external media-hosting service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::MediaHost;

/// HTTP client for the media host's upload API.
pub struct HttpMediaHost {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: &'a str,
    folder: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpMediaHost {
    /// Create a new media host client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the media host (e.g., "https://media.example.com")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    /// Get the base URL of the media host.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(&self, payload: &str, folder: &str) -> Result<String> {
        let url = format!("{}/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&UploadRequest {
                file: payload,
                folder,
            })
            .send()
            .await
            .context("Failed to connect to media host")?;

        if !response.status().is_success() {
            anyhow::bail!("Media upload failed with status: {}", response.status());
        }

        let body: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;
        Ok(body.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let host = HttpMediaHost::new("https://media.example.com".to_string(), 30);
        assert_eq!(host.base_url(), "https://media.example.com");
    }

    #[test]
    fn test_trailing_slash_removal() {
        let host = HttpMediaHost::new("https://media.example.com/".to_string(), 30);
        assert_eq!(host.base_url(), "https://media.example.com");
    }
}
