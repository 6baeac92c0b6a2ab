//! HTTP request handlers

use crate::api::models::{CreateGenerationRequest, UploadForm, WelcomeResponse};
use crate::api::multipart::MediaUpload;
use crate::backend::{CostEstimate, GenerationJob, GenerationRequest, ResourceType};
use crate::error::{AppError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

pub const WELCOME_MESSAGE: &str = "Welcome to the LipSync API. Visit /docs for documentation.";

const UPLOAD_FAILED: &str = "File upload to Cloudinary failed.";
const UPLOAD_FAILED_FOR_ESTIMATE: &str = "File upload to Cloudinary failed for cost estimation.";

/// Create a new lip-sync generation job
#[utoipa::path(
    post,
    path = "/generations",
    tag = "Generations",
    request_body = CreateGenerationRequest,
    responses(
        (status = 200, description = "Generation created", body = GenerationJob),
        (status = 500, description = "Generation service error", body = ErrorResponse)
    )
)]
pub async fn create_generation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateGenerationRequest>,
) -> Result<Json<GenerationJob>, AppError> {
    info!(model = %request.model, "Received generation request");

    let generation = GenerationRequest::lipsync(request.video_url, request.audio_url, request.model)
        .with_options(request.options);

    let job = state
        .generations
        .create(generation)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    info!(id = job.id().unwrap_or_default(), status = job.status().unwrap_or_default(), "Generation created");
    Ok(Json(job))
}

/// Get the status and details of a generation job
#[utoipa::path(
    get,
    path = "/generations/{id}",
    tag = "Generations",
    params(("id" = String, Path, description = "Generation identifier")),
    responses(
        (status = 200, description = "Generation found", body = GenerationJob),
        (status = 404, description = "Generation lookup failed", body = ErrorResponse)
    )
)]
pub async fn get_generation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GenerationJob>, AppError> {
    // Every lookup failure is reported as 404, transient ones included
    let job = state
        .generations
        .get(&id)
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(job))
}

/// List all previous generation jobs
#[utoipa::path(
    get,
    path = "/generations",
    tag = "Generations",
    responses(
        (status = 200, description = "All generations", body = [GenerationJob]),
        (status = 500, description = "Generation service error", body = ErrorResponse)
    )
)]
pub async fn list_generations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GenerationJob>>, AppError> {
    let jobs = state
        .generations
        .list()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    info!(count = jobs.len(), "Listed generations");
    Ok(Json(jobs))
}

/// Upload both files and estimate the cost of a generation
#[utoipa::path(
    post,
    path = "/generations/estimate-cost",
    tag = "Generations",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cost estimate", body = CostEstimate),
        (status = 422, description = "Malformed form", body = ErrorResponse),
        (status = 500, description = "Upload or generation service error", body = ErrorResponse)
    )
)]
pub async fn estimate_cost(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<CostEstimate>, AppError> {
    let upload = MediaUpload::from_multipart(multipart).await?;
    info!(model = %upload.model, "Received cost estimation request");

    let model = upload.model.clone();
    let (video_url, audio_url) = upload_media(&state, upload, UPLOAD_FAILED_FOR_ESTIMATE).await?;

    let cost = state
        .generations
        .estimate_cost(GenerationRequest::lipsync(video_url, audio_url, model))
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(cost))
}

/// Upload a video and an audio file, then create a generation from them
#[utoipa::path(
    post,
    path = "/upload-and-generate",
    tag = "Generations",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generation created", body = GenerationJob),
        (status = 422, description = "Malformed form", body = ErrorResponse),
        (status = 500, description = "Upload or generation service error", body = ErrorResponse)
    )
)]
pub async fn upload_and_generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<GenerationJob>, AppError> {
    let upload = MediaUpload::from_multipart(multipart).await?;
    info!(model = %upload.model, "Received upload-and-generate request");

    let model = upload.model.clone();
    let (video_url, audio_url) = upload_media(&state, upload, UPLOAD_FAILED).await?;

    let job = state
        .generations
        .create(GenerationRequest::lipsync(video_url, audio_url, model))
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    info!(id = job.id().unwrap_or_default(), "Generation created from uploads");
    Ok(Json(job))
}

/// Root endpoint to check if the API is running
#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    responses((status = 200, description = "Service is up", body = WelcomeResponse))
)]
pub async fn read_root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Upload video then audio; both must come back with a secure URL.
///
/// Both uploads use the `video` resource type, which is how the media host
/// files audio as well.
async fn upload_media(
    state: &AppState,
    upload: MediaUpload,
    failure_detail: &str,
) -> Result<(String, String), AppError> {
    let video = state
        .uploader
        .upload(upload.video, ResourceType::Video)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let audio = state
        .uploader
        .upload(upload.audio, ResourceType::Video)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    match (video.secure_url, audio.secure_url) {
        (Some(video_url), Some(audio_url)) if !video_url.is_empty() && !audio_url.is_empty() => {
            Ok((video_url, audio_url))
        }
        _ => Err(AppError::Upstream(failure_detail.to_string())),
    }
}
