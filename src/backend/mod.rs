//! Backend module - collaborator traits and their HTTP bindings

pub mod cloudinary;
pub mod error;
pub mod sync_client;
pub mod traits;

pub use cloudinary::CloudinaryUploader;
pub use error::{GenerationError, UploadError};
pub use sync_client::SyncClient;
pub use traits::{
    CostEstimate, GenerationClient, GenerationInput, GenerationJob, GenerationRequest,
    MediaUploader, ResourceType, UploadFile, UploadedMedia, DEFAULT_MODEL,
};
