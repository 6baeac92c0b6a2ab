//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::backend::{CostEstimate, GenerationInput, GenerationJob};
use crate::config::CorsConfig;
use crate::error::ErrorResponse;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LipSync API",
        version = "1.0.0",
        description = "HTTP gateway for uploading media and running lip-sync generations.",
        license(name = "MIT"),
    ),
    paths(
        handlers::create_generation,
        handlers::get_generation,
        handlers::list_generations,
        handlers::estimate_cost,
        handlers::upload_and_generate,
        handlers::read_root,
    ),
    components(schemas(
        CreateGenerationRequest,
        UploadForm,
        WelcomeResponse,
        GenerationInput,
        GenerationJob,
        CostEstimate,
        ErrorResponse,
    )),
    tags(
        (name = "Generations", description = "Lip-sync generation endpoints"),
        (name = "Root", description = "Liveness endpoint"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let max_upload = state.settings.server.max_upload_bytes();
    let cors = cors_layer(&state.settings.cors);

    // Upload routes take whole media files, well past axum's default limit
    let upload_routes = Router::new()
        .route("/generations/estimate-cost", post(handlers::estimate_cost))
        .route("/upload-and-generate", post(handlers::upload_and_generate))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload));

    Router::new()
        .route("/", get(handlers::read_root))
        .route(
            "/generations",
            post(handlers::create_generation).get(handlers::list_generations),
        )
        .route("/generations/:id", get(handlers::get_generation))
        .merge(upload_routes)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Cross-origin policy: listed origins, any method or header, credentials allowed
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
