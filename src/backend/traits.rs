//! Collaborator traits and the records that flow through them

use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::backend::error::{GenerationError, UploadError};

/// Model used when a request does not name one
pub const DEFAULT_MODEL: &str = "lipsync-2";

/// A single media input of a generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationInput {
    Video { url: String },
    Audio { url: String },
}

/// Body sent to the generation service for create and cost estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub input: Vec<GenerationInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl GenerationRequest {
    /// Build a lip-sync request; the video descriptor always comes first
    pub fn lipsync(
        video_url: impl Into<String>,
        audio_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input: vec![
                GenerationInput::Video {
                    url: video_url.into(),
                },
                GenerationInput::Audio {
                    url: audio_url.into(),
                },
            ],
            options: None,
        }
    }

    pub fn with_options(mut self, options: Option<Value>) -> Self {
        self.options = options;
        self
    }
}

/// Job record as returned by the generation service, forwarded untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct GenerationJob(pub Value);

impl GenerationJob {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }
}

/// Cost estimate as returned by the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct CostEstimate(pub Value);

/// Resource class the media host files an upload under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    /// Also used for audio, which the media host classifies as video
    Video,
    Raw,
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Raw => "raw",
            ResourceType::Auto => "auto",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded file held in memory for the lifetime of one request
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Result of a media upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    #[serde(default)]
    pub secure_url: Option<String>,
}

/// Remote lip-sync generation service
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Submit a new generation job
    async fn create(&self, request: GenerationRequest) -> Result<GenerationJob, GenerationError>;

    /// Fetch a job by its identifier
    async fn get(&self, id: &str) -> Result<GenerationJob, GenerationError>;

    /// List all jobs known to the service
    async fn list(&self) -> Result<Vec<GenerationJob>, GenerationError>;

    /// Estimate the cost of a job without submitting it
    async fn estimate_cost(&self, request: GenerationRequest)
        -> Result<CostEstimate, GenerationError>;
}

/// Media host that turns raw files into public URLs
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(
        &self,
        file: UploadFile,
        resource_type: ResourceType,
    ) -> Result<UploadedMedia, UploadError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lipsync_request_orders_video_first() {
        let request = GenerationRequest::lipsync("https://x/v.mp4", "https://x/a.mp3", DEFAULT_MODEL);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "lipsync-2",
                "input": [
                    {"type": "video", "url": "https://x/v.mp4"},
                    {"type": "audio", "url": "https://x/a.mp3"}
                ]
            })
        );
    }

    #[test]
    fn test_options_serialized_when_present() {
        let request = GenerationRequest::lipsync("v", "a", "lipsync-2")
            .with_options(Some(json!({"sync_mode": "loop"})));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["options"]["sync_mode"], "loop");
    }

    #[test]
    fn test_job_accessors() {
        let job: GenerationJob =
            serde_json::from_value(json!({"id": "gen_1", "status": "PENDING", "extra": 1})).unwrap();
        assert_eq!(job.id(), Some("gen_1"));
        assert_eq!(job.status(), Some("PENDING"));
        assert_eq!(job.0["extra"], 1);
    }

    #[test]
    fn test_resource_type_str() {
        assert_eq!(ResourceType::Video.to_string(), "video");
        assert_eq!(ResourceType::Auto.as_str(), "auto");
    }
}
