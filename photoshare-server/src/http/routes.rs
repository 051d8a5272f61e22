//! Route handlers
//!
//! - `GET /api/uploads/{filename}`: stored upload bytes
//! - `GET /api/health`: liveness
//! - `GET /api/status`: database reachability

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::uploads::{serve_upload, UploadError, UploadedFile};

/// API routes: /api/*
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/uploads/{filename}", get(get_upload))
}

/// GET /api/uploads/{filename}
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<UploadedFile, UploadError> {
    serve_upload(state.upload_dir(), &filename).await
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct StatusResponse {
    database: bool,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let database = match state.db() {
        Some(db) => db.ping().await,
        None => false,
    };

    Json(StatusResponse { database })
}
