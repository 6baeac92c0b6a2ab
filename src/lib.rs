//! LipSync Gateway
//!
//! An HTTP gateway that uploads media to a hosting service and forwards
//! lip-sync generation jobs to a remote generation service.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::{CloudinaryUploader, GenerationClient, MediaUploader, SyncClient};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub generations: Arc<dyn GenerationClient>,
    pub uploader: Arc<dyn MediaUploader>,
}

impl AppState {
    /// Build the production collaborators from settings
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let generations = Arc::new(SyncClient::new(&settings.sync)?);
        let uploader = Arc::new(CloudinaryUploader::new(&settings.cloudinary)?);

        if !uploader.is_configured() {
            tracing::warn!("Cloudinary credentials missing; upload endpoints will fail");
        }

        Ok(Self {
            settings: Arc::new(settings),
            generations,
            uploader,
        })
    }
}
