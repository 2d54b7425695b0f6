use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::models::ProviderProfile;

/// Errors that can occur when talking to the provider directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Provider Directory API client
///
/// The directory is the external system of record for provider profiles; the
/// engine pulls a snapshot from it at startup and receives pushes through the
/// HTTP surface afterward.
pub struct DirectoryClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl DirectoryClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    /// Fetch the full provider snapshot
    pub async fn fetch_providers(&self) -> Result<Vec<ProviderProfile>, DirectoryError> {
        let url = format!("{}/providers", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DirectoryError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::ApiError(format!("{}: {}", status, body)));
        }

        let payload: serde_json::Value = response.json().await?;

        // Accept either a bare array or a {"providers": [...]} document
        let records = payload
            .get("providers")
            .and_then(|value| value.as_array())
            .or_else(|| payload.as_array())
            .ok_or_else(|| {
                DirectoryError::InvalidResponse("expected a provider array".to_string())
            })?;

        records
            .iter()
            .map(|record| {
                serde_json::from_value(record.clone())
                    .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))
            })
            .collect()
    }
}
