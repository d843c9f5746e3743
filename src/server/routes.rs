//! HTTP API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the router: health at the root, versioned API under /api/v1.
pub fn create_router(app_state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/compare", post(handlers::compare))
        .with_state(app_state);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_v1)
}
