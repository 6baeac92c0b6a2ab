//! Errors raised by the collaborator bindings

use thiserror::Error;

/// Failure talking to the generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),
}

/// Failure uploading to the media host
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Cloudinary credentials are not configured")]
    MissingCredentials,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),
}

/// Pull a human readable message out of an upstream error body.
///
/// Looks for `message`, `detail` or `error` (string or `{ "message": .. }`)
/// and falls back to the raw body text.
pub(crate) fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "detail", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(nested @ serde_json::Value::Object(_)) => {
                    if let Some(s) = nested.get("message").and_then(|m| m.as_str()) {
                        return s.to_string();
                    }
                }
                _ => {}
            }
        }
    }

    body.trim().to_string()
}
