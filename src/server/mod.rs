//! HTTP surface of the proxy
//!
//! Routes:
//! - `POST /api/generate-image` forwards a prompt to the image service
//! - `GET /health` liveness probe

pub mod handler;

pub use handler::{generate_image_handler, proxy_prompt};

use crate::models::Config;
use crate::upstream::{ImageGenerationService, ImageServiceClient};
use crate::Result;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn ImageGenerationService>,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerationService>) -> Self {
        Self { generator }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(ImageServiceClient::new(
            config.image_service_url.clone(),
        )))
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate-image", post(generate_image_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serves the app on an already-bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Proxy listening on http://{}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy stopped");
    Ok(())
}

pub async fn run(config: &Config) -> Result<()> {
    info!(
        "Forwarding prompts to image service at {}",
        config.image_service_url
    );
    let listener = TcpListener::bind(config.bind_addr).await?;
    serve(listener, AppState::from_config(config)).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::MockImageGenerationClient;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        create_app(AppState::new(Arc::new(MockImageGenerationClient::new())))
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_route_rejects_get() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/generate-image")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_app()
            .oneshot(Request::get("/api/other").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
