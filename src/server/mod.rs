//! HTTP API server
//!
//! Axum-based REST surface over the comparison orchestrator.

mod handlers;
mod routes;
mod types;

pub use handlers::{AppState, MAX_TEXT_LENGTH, MAX_TOP_K};
pub use routes::create_router;
pub use types::{CompareRequest, ErrorResponse, HealthResponse};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::Method;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::HttpConfig;
use crate::query::CompareService;

/// HTTP API server
pub struct HttpServer {
    config: HttpConfig,
    service: Arc<CompareService>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: HttpConfig, service: Arc<CompareService>) -> Self {
        Self { config, service }
    }

    /// Run the HTTP server until the shutdown channel fires
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .context("Invalid HTTP listen address")?;

        let app_state = AppState {
            service: self.service.clone(),
        };
        let mut app = create_router(app_state);

        if self.config.cors_enabled {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
                .allow_origin(Any);
            app = app.layer(cors);
        }

        app = app.layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;

        info!("HTTP API server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listen_addr() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        assert_eq!(addr.port(), 8080);

        let addr: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        assert_eq!(addr.port(), 9000);
    }
}
