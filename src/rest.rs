// Copyright 2026 Pagelift Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for Pagelift.
//!
//! A thin boundary over [`Scraper::run`]: the handler translates the pipeline
//! outcome into a transport response and nothing more. Success is the plain
//! JSON list of images with status 200; failure is `{"error": ...}` with
//! status 500.

use crate::browser::{chromium, SessionManager};
use crate::config::ScrapeConfig;
use crate::pipeline::{ScrapeOutcome, Scraper};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// State shared by all REST handlers.
pub struct SharedState {
    sessions: Arc<dyn SessionManager>,
    config: ScrapeConfig,
    started_at: Instant,
}

impl SharedState {
    pub fn new(sessions: Arc<dyn SessionManager>, config: ScrapeConfig) -> Self {
        Self {
            sessions,
            config,
            started_at: Instant::now(),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<SharedState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/scrape", post(handle_scrape))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given port.
pub async fn start(port: u16, state: Arc<SharedState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_status(State(state): State<Arc<SharedState>>) -> Json<Value> {
    Json(serde_json::json!({
        "running": true,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "chromium_available": chromium::find_chromium().is_some(),
    }))
}

/// Scrape request body.
#[derive(Debug, serde::Deserialize)]
struct ScrapeParams {
    url: String,
    timeout_ms: Option<u64>,
    user_agent: Option<String>,
}

async fn handle_scrape(
    State(state): State<Arc<SharedState>>,
    Json(params): Json<ScrapeParams>,
) -> (StatusCode, Json<Value>) {
    if let Err(e) = url::Url::parse(&params.url) {
        let error = format!("invalid url {:?}: {e}", params.url);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": error })),
        );
    }

    let config = state
        .config
        .with_overrides(params.timeout_ms, params.user_agent);
    let scraper = Scraper::new(Arc::clone(&state.sessions), config);

    match scraper.run(&params.url).await {
        ScrapeOutcome::Success(images) => (StatusCode::OK, Json(serde_json::json!(images))),
        ScrapeOutcome::Failure(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": error })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::PageSession;
    use crate::error::ScrapeError;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    /// Session manager double whose engine never starts.
    struct NoBrowser;

    #[async_trait]
    impl SessionManager for NoBrowser {
        async fn acquire(&self) -> Result<Box<dyn PageSession>, ScrapeError> {
            Err(ScrapeError::Launch("no browser in tests".into()))
        }
    }

    fn test_router() -> Router {
        let state = Arc::new(SharedState::new(
            Arc::new(NoBrowser),
            ScrapeConfig::default(),
        ));
        router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_status_reports_version() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["running"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_scrape_failure_maps_to_500_with_error_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scrape")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"url": "https://example.com/chapter/1"}"#))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("browser launch failed"));
    }

    #[tokio::test]
    async fn test_scrape_rejects_unparseable_url() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scrape")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"url": "not a url"}"#))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid url"));
    }
}
