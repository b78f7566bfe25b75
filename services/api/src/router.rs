//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, the not-found fallback, and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ErrorResponse, HealthResponse, LearnPayload, LearnResponse, WordExplanationPayload,
        WordExplanationResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::learn_topic,
        handlers::explain_word,
        handlers::health,
    ),
    components(
        schemas(LearnPayload, LearnResponse, WordExplanationPayload, WordExplanationResponse, HealthResponse, ErrorResponse)
    ),
    tags(
        (name = "Biology Learning API", description = "Topic overviews, quizzes and word explanations for biology learners")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/biology/learn", post(handlers::learn_topic))
        .route(
            "/api/biology/word-explanation",
            post(handlers::explain_word),
        )
        .fallback(handlers::not_found)
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
