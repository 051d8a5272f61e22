//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing and timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::ServerConfig;
use crate::db::{Database, DbError};
use crate::state::AppState;

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Build the application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors);

    Router::new()
        .nest("/api", routes::api_router())
        .layer(middleware)
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let db = Database::connect(&database_url).await?;
/// run_server(db, ServerConfig::with_upload_dir("/srv/photoshare/uploads")).await?;
/// ```
pub async fn run_server(db: Database, config: ServerConfig) -> Result<(), ServerError> {
    // Tables exist before the first request is served.
    db.ensure_schema().await?;

    if !config.upload_dir.is_dir() {
        tracing::warn!(upload_dir = %config.upload_dir.display(), "upload directory does not exist yet");
    }
    tracing::info!(upload_dir = %config.upload_dir.display(), "serving uploads");

    let state = AppState::new(db, config.upload_dir.clone());
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        dir: TempDir,
        router: Router,
    }

    impl TestApp {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let root = dir.path().join("uploads");
            std::fs::create_dir(&root).unwrap();

            let config = ServerConfig::with_upload_dir(&root);
            let router = build_router(AppState::uploads_only(root), &config);
            Self { dir, router }
        }

        fn write_upload(&self, name: &str, bytes: &[u8]) {
            std::fs::write(self.dir.path().join("uploads").join(name), bytes).unwrap();
        }

        async fn get(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
            let response = self
                .router
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            let status = response.status();
            let headers = response.headers().clone();
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, headers, body.to_vec())
        }
    }

    #[tokio::test]
    async fn serves_stored_png() {
        let app = TestApp::new();
        app.write_upload("cat.png", b"\x89PNG-bytes");

        let (status, headers, body) = app.get("/api/uploads/cat.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            headers[header::CACHE_CONTROL],
            "public, max-age=31536000, immutable"
        );
        assert_eq!(body, b"\x89PNG-bytes");
    }

    #[tokio::test]
    async fn unknown_extension_falls_back_to_octet_stream() {
        let app = TestApp::new();
        app.write_upload("scan.bmp", b"BM");

        let (status, headers, _) = app.get("/api/uploads/scan.bmp").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let app = TestApp::new();

        let (status, _, body) = app.get("/api/uploads/missing.jpg").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "File not found" }));
    }

    #[tokio::test]
    async fn encoded_traversal_is_400() {
        let app = TestApp::new();
        std::fs::write(app.dir.path().join("secret.txt"), b"hunter2").unwrap();

        for uri in [
            "/api/uploads/..%2Fsecret.txt",
            "/api/uploads/%2E%2E%2Fsecret.txt",
            "/api/uploads/..%2F..%2F..%2Fetc%2Fpasswd",
        ] {
            let (status, _, body) = app.get(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body, json!({ "error": "Invalid path" }));
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new();

        let (status, _, body) = app.get("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn status_without_database() {
        let app = TestApp::new();

        let (status, _, body) = app.get("/api/status").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "database": false }));
    }
}
