//! Axum Handlers for the REST API
//!
//! Each handler validates its payload, forwards one request to the content
//! service under the configured timeout, and reshapes the result into JSON.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use biolearn_core::word::WordExplanation;
use chrono::Utc;
use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{error, info, warn};

use crate::{
    models::{
        ErrorResponse, HealthResponse, LearnPayload, LearnResponse, SERVICE_NAME,
        WordExplanationPayload, WordExplanationResponse,
    },
    state::AppState,
};

const DEFAULT_WORD_CONTEXT: &str = "biology";

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The upstream call exceeded the configured timeout.
    Timeout { elapsed: Duration },
    /// The upstream call failed. `message` is what the client sees.
    Upstream {
        message: &'static str,
        source: anyhow::Error,
        elapsed: Duration,
    },
}

fn failure(status: StatusCode, error: String, elapsed: Option<Duration>) -> Response {
    let body = ErrorResponse {
        success: false,
        error,
        response_time: elapsed.map(|e| e.as_millis() as u64),
        timestamp: elapsed.map(|_| Utc::now()),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => failure(StatusCode::BAD_REQUEST, message, None),
            ApiError::NotFound(message) => failure(StatusCode::NOT_FOUND, message, None),
            ApiError::Timeout { elapsed } => {
                warn!(elapsed_ms = elapsed.as_millis() as u64, "Upstream request timed out");
                failure(
                    StatusCode::REQUEST_TIMEOUT,
                    "Request timeout".to_string(),
                    Some(elapsed),
                )
            }
            ApiError::Upstream {
                message,
                source,
                elapsed,
            } => {
                error!("Upstream request failed: {:?}", source);
                failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message.to_string(),
                    Some(elapsed),
                )
            }
        }
    }
}

/// Returns the trimmed value, or a 400 with `message` when it is missing or blank.
fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

/// Runs one upstream call under `timeout`, returning its value and duration.
async fn bounded<T>(
    timeout: Duration,
    message: &'static str,
    call: impl Future<Output = anyhow::Result<T>>,
) -> Result<(T, Duration), ApiError> {
    let started = Instant::now();
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok((value, started.elapsed())),
        Ok(Err(source)) => Err(ApiError::Upstream {
            message,
            source,
            elapsed: started.elapsed(),
        }),
        Err(_) => Err(ApiError::Timeout {
            elapsed: started.elapsed(),
        }),
    }
}

/// Generate learning content for a biology topic.
#[utoipa::path(
    post,
    path = "/api/biology/learn",
    request_body = LearnPayload,
    responses(
        (status = 200, description = "Learning content generated", body = LearnResponse),
        (status = 400, description = "Invalid JSON or missing topic", body = ErrorResponse),
        (status = 408, description = "Upstream request timed out", body = ErrorResponse),
        (status = 500, description = "Upstream request failed", body = ErrorResponse)
    )
)]
pub async fn learn_topic(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LearnPayload>, JsonRejection>,
) -> Result<Json<LearnResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;
    let topic = required(payload.topic, "Topic is required")?;

    let (content, elapsed) = bounded(
        state.config.request_timeout,
        "Failed to generate biology content",
        state.content_service.learn_topic(&topic),
    )
    .await?;

    info!(%topic, elapsed_ms = elapsed.as_millis() as u64, "Served learning content");
    Ok(Json(LearnResponse::new(
        topic,
        content,
        elapsed.as_millis() as u64,
    )))
}

/// Explain a single word in context.
#[utoipa::path(
    post,
    path = "/api/biology/word-explanation",
    request_body = WordExplanationPayload,
    responses(
        (status = 200, description = "Explanation generated", body = WordExplanationResponse),
        (status = 400, description = "Invalid JSON or missing word", body = ErrorResponse),
        (status = 408, description = "Upstream request timed out", body = ErrorResponse),
        (status = 500, description = "Upstream request failed", body = ErrorResponse)
    )
)]
pub async fn explain_word(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WordExplanationPayload>, JsonRejection>,
) -> Result<Json<WordExplanationResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;
    let word = required(payload.word, "Word is required")?;
    let context = payload
        .context
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_WORD_CONTEXT.to_string());

    let (explanation, elapsed) = bounded(
        state.config.request_timeout,
        "Failed to generate word explanation",
        state.content_service.explain_word(&word, &context),
    )
    .await?;

    info!(%word, %context, elapsed_ms = elapsed.as_millis() as u64, "Served word explanation");
    Ok(Json(WordExplanationResponse {
        success: true,
        details: WordExplanation::parse(&word, &explanation),
        word,
        explanation,
        response_time: elapsed.as_millis() as u64,
        timestamp: Utc::now(),
    }))
}

/// Report service status.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        service: SERVICE_NAME.to_string(),
        mode: state.content_service.mode(),
        timestamp: Utc::now(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
