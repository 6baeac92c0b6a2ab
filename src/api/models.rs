//! API request and response models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::backend::DEFAULT_MODEL;

/// Create a generation from already hosted media
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateGenerationRequest {
    /// URL of the source video file
    pub video_url: String,

    /// URL of the source audio file
    pub audio_url: String,

    /// The model to use for generation (e.g. "lipsync-2.1-pro")
    #[serde(default = "default_model")]
    pub model: String,

    /// Generation options forwarded verbatim to the generation service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub options: Option<Value>,
}

pub fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Multipart form accepted by the upload endpoints
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// The video file to upload
    #[schema(value_type = String, format = Binary)]
    pub video_file: Vec<u8>,

    /// The audio file to upload
    #[schema(value_type = String, format = Binary)]
    pub audio_file: Vec<u8>,

    /// The model to use for generation
    #[schema(default = "lipsync-2")]
    pub model: Option<String>,
}

/// Liveness payload
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_defaults_when_omitted() {
        let request: CreateGenerationRequest = serde_json::from_str(
            r#"{"video_url":"https://x/v.mp4","audio_url":"https://x/a.mp3"}"#,
        )
        .unwrap();

        assert_eq!(request.model, "lipsync-2");
        assert!(request.options.is_none());
    }

    #[test]
    fn test_explicit_model_kept() {
        let request: CreateGenerationRequest = serde_json::from_str(
            r#"{"video_url":"v","audio_url":"a","model":"lipsync-2.1-pro"}"#,
        )
        .unwrap();

        assert_eq!(request.model, "lipsync-2.1-pro");
    }
}
