//! Generation client for the Sync Labs v2 REST API

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT},
    Client, Response, Url,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use crate::backend::error::{extract_message, GenerationError};
use crate::backend::traits::{CostEstimate, GenerationClient, GenerationJob, GenerationRequest};
use crate::config::SyncConfig;
use crate::error::{AppError, Result};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the lip-sync generation service
pub struct SyncClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl SyncClient {
    /// Create a new client from configuration
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        // Url::join drops the last segment unless the base ends with a slash
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| {
            AppError::Config(config::ConfigError::Message(format!(
                "Invalid sync.base_url '{}': {}",
                config.base_url, e
            )))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        headers
    }

    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, GenerationError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GenerationError::InvalidResponse("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: &str,
        response: Response,
    ) -> std::result::Result<T, GenerationError> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                error!(operation = operation, error = %e, "Failed to parse generation service response");
                GenerationError::InvalidResponse(e.to_string())
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body);
        error!(
            operation = operation,
            status = status.as_u16(),
            message = %message,
            "Generation service returned an error"
        );

        Err(GenerationError::Api {
            status: status.as_u16(),
            message: if message.is_empty() {
                format!("Generation service returned {}", status)
            } else {
                message
            },
        })
    }
}

#[async_trait]
impl GenerationClient for SyncClient {
    async fn create(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationJob, GenerationError> {
        let url = self.endpoint(&["generate"])?;
        debug!(url = %url, model = %request.model, "Creating generation");

        let response = self
            .client
            .post(url)
            .headers(self.get_headers())
            .json(&request)
            .send()
            .await?;

        self.decode("create", response).await
    }

    async fn get(&self, id: &str) -> std::result::Result<GenerationJob, GenerationError> {
        let url = self.endpoint(&["generate", id])?;
        debug!(url = %url, id = %id, "Fetching generation");

        let response = self
            .client
            .get(url)
            .headers(self.get_headers())
            .send()
            .await?;

        self.decode("get", response).await
    }

    async fn list(&self) -> std::result::Result<Vec<GenerationJob>, GenerationError> {
        let url = self.endpoint(&["generations"])?;
        debug!(url = %url, "Listing generations");

        let response = self
            .client
            .get(url)
            .headers(self.get_headers())
            .send()
            .await?;

        self.decode("list", response).await
    }

    async fn estimate_cost(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<CostEstimate, GenerationError> {
        let url = self.endpoint(&["analyze", "cost"])?;
        debug!(url = %url, model = %request.model, "Estimating generation cost");

        let response = self
            .client
            .post(url)
            .headers(self.get_headers())
            .json(&request)
            .send()
            .await?;

        self.decode("estimate_cost", response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SyncConfig {
        SyncConfig {
            api_key: "sk-test".to_string(),
            base_url: base_url.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = SyncClient::new(&config("https://api.sync.so/v2")).unwrap();
        assert_eq!(
            client.endpoint(&["generate"]).unwrap().as_str(),
            "https://api.sync.so/v2/generate"
        );
    }

    #[test]
    fn test_endpoint_encodes_id_as_one_segment() {
        let client = SyncClient::new(&config("https://api.sync.so/v2/")).unwrap();
        assert_eq!(
            client.endpoint(&["generate", "a/b c"]).unwrap().as_str(),
            "https://api.sync.so/v2/generate/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(SyncClient::new(&config("not a url")).is_err());
    }
}
