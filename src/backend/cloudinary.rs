//! Media uploader backed by Cloudinary's signed upload API

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::backend::error::{extract_message, UploadError};
use crate::backend::traits::{MediaUploader, ResourceType, UploadFile, UploadedMedia};
use crate::config::CloudinaryConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
struct Credentials {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

/// Uploads request files to Cloudinary and returns their secure URLs
pub struct CloudinaryUploader {
    client: Client,
    base_url: String,
    folder: String,
    credentials: Option<Credentials>,
}

impl CloudinaryUploader {
    pub fn new(config: &CloudinaryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let credentials = if config.has_credentials() {
            Some(Credentials {
                cloud_name: config.cloud_name.clone().unwrap_or_default(),
                api_key: config.api_key.clone().unwrap_or_default(),
                api_secret: config.api_secret.clone().unwrap_or_default(),
            })
        } else {
            None
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            folder: config.folder.clone(),
            credentials,
        })
    }

    /// Whether uploads can be attempted at all
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    fn upload_url(&self, cloud_name: &str, resource_type: ResourceType) -> String {
        format!("{}/{}/{}/upload", self.base_url, cloud_name, resource_type)
    }
}

/// Compute a Cloudinary request signature.
///
/// Parameters are serialized as `key=value` in key order, joined with `&`,
/// suffixed with the API secret and hashed with SHA-256.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(
        &self,
        file: UploadFile,
        resource_type: ResourceType,
    ) -> std::result::Result<UploadedMedia, UploadError> {
        let credentials = self.credentials.as_ref().ok_or(UploadError::MissingCredentials)?;

        let mut params = BTreeMap::new();
        params.insert("folder", self.folder.clone());
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = sign_params(&params, &credentials.api_secret);

        let size = file.data.len();
        let mut part = Part::stream_with_length(file.data, size as u64)
            .file_name(file.file_name.unwrap_or_else(|| "upload".to_string()));
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", credentials.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = self.upload_url(&credentials.cloud_name, resource_type);
        debug!(url = %url, bytes = size, resource_type = %resource_type, "Uploading media");

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_message(&body);
            error!(status = status.as_u16(), message = %message, "Media upload rejected");
            return Err(UploadError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded = response
            .json::<UploadedMedia>()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        info!(
            secure_url = uploaded.secure_url.as_deref().unwrap_or("<none>"),
            resource_type = %resource_type,
            "Media uploaded"
        );

        Ok(uploaded)
    }
}
