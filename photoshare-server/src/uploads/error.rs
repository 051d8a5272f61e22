//! Upload serving errors with IntoResponse
//!
//! Bodies are `{"error": "..."}`; I/O causes are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    /// Requested name resolves outside the upload root (400)
    #[error("invalid path")]
    InvalidPath,

    /// Nothing servable at the resolved path (404)
    #[error("file not found")]
    NotFound,

    /// Any other failure while reading (500, logged)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPath => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::InvalidPath => "Invalid path",
            Self::NotFound => "File not found",
            Self::Io(e) => {
                tracing::error!(error = %e, "Error serving file");
                "Internal server error"
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: UploadError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_path_is_400() {
        let (status, body) = body_json(UploadError::InvalidPath).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid path" }));
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = body_json(UploadError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "File not found" }));
    }

    #[tokio::test]
    async fn io_error_is_500_without_details() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path denied");
        let (status, body) = body_json(UploadError::Io(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
