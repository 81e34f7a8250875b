//! Tally REST API
//!
//! HTTP API layer for Tally, built with Axum.
//!
//! # Endpoints
//!
//! ## Issue reports
//! - `POST /api/report-issue` - Validate and relay an issue report
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::api::{serve, ApiConfig, AppState};
//! use tally::relay::{ContactRelay, RelayConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let relay = Arc::new(ContactRelay::new(RelayConfig::default())?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(relay, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/report-issue", post(routes::report::report_issue))
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::permissive().allow_origin(allowed)
    }
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Tally API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Tally API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::RelayPayload;
    use crate::relay::{Relay, RelayError};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::sync::Mutex;
    use tower::util::ServiceExt;

    /// Relay double that records payloads and answers with a fixed outcome
    #[derive(Default)]
    struct RecordingRelay {
        forwarded: Mutex<Vec<RelayPayload>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl Relay for RecordingRelay {
        async fn forward(&self, payload: &RelayPayload) -> Result<serde_json::Value, RelayError> {
            self.forwarded.lock().unwrap().push(payload.clone());
            match self.fail_with {
                Some(status) => Err(RelayError::Upstream {
                    status,
                    message: "relay failed".to_string(),
                }),
                None => Ok(serde_json::json!({"success": true, "id": "msg-42"})),
            }
        }
    }

    fn create_test_app(relay: Arc<RecordingRelay>) -> Router {
        let state = AppState::new(relay, ApiConfig::default())
            .with_recipient(Some("support@example.org".to_string()));
        build_router(state)
    }

    fn report_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/report-issue")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(Arc::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(Arc::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_report_missing_description() {
        let relay = Arc::new(RecordingRelay::default());
        let app = create_test_app(Arc::clone(&relay));

        let response = app
            .oneshot(report_request(
                r#"{"name": "Ana", "email": "ana@example.org", "subject": "Broken"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("Missing required fields"));
        assert!(message.contains("description"));
        assert!(relay.forwarded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_invalid_email() {
        let relay = Arc::new(RecordingRelay::default());
        let app = create_test_app(Arc::clone(&relay));

        let response = app
            .oneshot(report_request(
                r#"{"name": "Ana", "email": "not-an-email", "subject": "Broken", "description": "Help"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Invalid email format");
        assert!(relay.forwarded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_forwarded_once() {
        let relay = Arc::new(RecordingRelay::default());
        let app = create_test_app(Arc::clone(&relay));

        let response = app
            .oneshot(report_request(
                r#"{
                    "name": " Ana ",
                    "email": "ana@example.org",
                    "organization": "Northside Pantry",
                    "subject": "Scanner offline",
                    "description": "<p>Dock scanner is <b>down</b></p>",
                    "priority": "high"
                }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], "msg-42");

        let forwarded = relay.forwarded.lock().unwrap();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].name, "Ana");
        assert_eq!(forwarded[0].kind, "issue_report");
        assert_eq!(forwarded[0].to.as_deref(), Some("support@example.org"));
        assert!(forwarded[0].message.contains("Organization: Northside Pantry"));
        assert!(forwarded[0].message.ends_with("Dock scanner is down"));
    }

    #[tokio::test]
    async fn test_report_relay_failure_passthrough() {
        let relay = Arc::new(RecordingRelay {
            fail_with: Some(503),
            ..Default::default()
        });
        let app = create_test_app(Arc::clone(&relay));

        let response = app
            .oneshot(report_request(
                r#"{"name": "Ana", "email": "ana@example.org", "subject": "s", "description": "d"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to send issue report");
        assert_eq!(relay.forwarded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_report_invalid_json() {
        let app = create_test_app(Arc::default());

        let response = app.oneshot(report_request("not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_body_too_large() {
        let relay = Arc::new(RecordingRelay::default());
        let config = ApiConfig {
            max_body_size: 64,
            ..Default::default()
        };
        let app = build_router(AppState::new(relay.clone(), config));

        let description = "x".repeat(512);
        let body = format!(
            r#"{{"name": "Ana", "email": "ana@example.org", "subject": "s", "description": "{}"}}"#,
            description
        );
        let response = app.oneshot(report_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["code"], "BODY_TOO_LARGE");
        assert!(relay.forwarded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_wrong_content_type() {
        let app = create_test_app(Arc::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/report-issue")
                    .header("Content-Type", "text/plain")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_cors_layer_ignores_bad_origins() {
        // Must not panic on junk entries
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
        let _ = cors_layer(&[]);
    }
}
