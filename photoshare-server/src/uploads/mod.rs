//! Upload file serving
//!
//! Resolves a requested filename under the upload root, refuses anything
//! that escapes it, and returns the whole file with a content type derived
//! from its extension. Served files are immutable, so responses carry a
//! one-year cache directive.

pub mod error;
pub mod mime;
pub mod path;

use std::io;
use std::path::{Path, PathBuf};

use axum::http::header;
use axum::response::{IntoResponse, Response};

pub use error::UploadError;
pub use mime::content_type_for;

/// Cache directive attached to every successful upload response.
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// A file read from the upload root, ready to send.
#[derive(Debug)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl IntoResponse for UploadedFile {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.content_type),
                (header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Read `filename` from beneath `root`.
///
/// # Errors
///
/// - [`UploadError::InvalidPath`] if the name resolves outside the root
/// - [`UploadError::NotFound`] if no regular file exists there
/// - [`UploadError::Io`] for any other read failure
pub async fn serve_upload(root: &Path, filename: &str) -> Result<UploadedFile, UploadError> {
    let target = path::resolve_within(root, filename).ok_or_else(|| {
        tracing::warn!(filename, "rejected upload path outside upload root");
        UploadError::InvalidPath
    })?;

    let metadata = match tokio::fs::metadata(&target).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(UploadError::NotFound),
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(UploadError::NotFound);
    }

    if !path::canonically_within(root, &target).await? {
        tracing::warn!(filename, "rejected upload symlinked outside upload root");
        return Err(UploadError::InvalidPath);
    }

    let bytes = tokio::fs::read(&target).await?;
    let content_type = content_type_for(&target);
    tracing::debug!(path = %target.display(), content_type, size = bytes.len(), "serving upload");

    Ok(UploadedFile {
        path: target,
        content_type,
        bytes,
    })
}
