//! HTTP API request handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, error};

use super::types::{CompareRequest, ErrorResponse, HealthResponse};
use crate::error::CompareError;
use crate::query::CompareService;

/// Maximum allowed input text length in bytes
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum accepted top_k
pub const MAX_TOP_K: usize = 50;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CompareService>,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Compare endpoint
pub async fn compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> impl IntoResponse {
    if request.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("EMPTY_TEXT", "Field 'text' must not be empty")),
        )
            .into_response();
    }
    if request.text.len() > MAX_TEXT_LENGTH {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "TEXT_TOO_LARGE",
                format!(
                    "Text length {} exceeds maximum allowed length of {} bytes",
                    request.text.len(),
                    MAX_TEXT_LENGTH
                ),
            )),
        )
            .into_response();
    }
    if request.top_k < 1 || request.top_k > MAX_TOP_K {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "INVALID_TOP_K",
                format!("top_k must be between 1 and {}", MAX_TOP_K),
            )),
        )
            .into_response();
    }

    debug!(
        "HTTP compare request: mode={}, top_k={}",
        request.mode, request.top_k
    );

    match state
        .service
        .compare(&request.text, request.top_k, request.mode)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            error!("Compare failed: {}", err);
            let status = match &err {
                // Upstream faults: the embedding backend or the store
                CompareError::Encode(_) | CompareError::Store(_) => StatusCode::BAD_GATEWAY,
                CompareError::Lexical(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse::new("COMPARE_FAILED", err.to_string())),
            )
                .into_response()
        }
    }
}
