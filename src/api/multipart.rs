//! Extraction of the video/audio upload form

use axum::extract::Multipart;

use crate::api::models::default_model;
use crate::backend::UploadFile;
use crate::error::{AppError, Result};

pub const VIDEO_FIELD: &str = "video_file";
pub const AUDIO_FIELD: &str = "audio_file";
pub const MODEL_FIELD: &str = "model";

/// Parsed upload form, held in memory for the duration of one request
#[derive(Debug)]
pub struct MediaUpload {
    pub video: UploadFile,
    pub audio: UploadFile,
    pub model: String,
}

impl MediaUpload {
    /// Read all parts of the form. Unknown parts are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut video = None;
        let mut audio = None;
        let mut model = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                VIDEO_FIELD | AUDIO_FIELD => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    let file = UploadFile {
                        file_name,
                        content_type,
                        data,
                    };
                    if name == VIDEO_FIELD {
                        video = Some(file);
                    } else {
                        audio = Some(file);
                    }
                }
                MODEL_FIELD => {
                    model = Some(field.text().await?);
                }
                _ => {}
            }
        }

        Ok(Self {
            video: video.ok_or_else(|| missing(VIDEO_FIELD))?,
            audio: audio.ok_or_else(|| missing(AUDIO_FIELD))?,
            model: model.unwrap_or_else(default_model),
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("Missing required form field '{}'", field))
}
