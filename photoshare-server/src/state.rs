//! Application state shared across handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Option<Database>,
    upload_dir: PathBuf,
}

impl AppState {
    pub fn new(db: Database, upload_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db: Some(db),
                upload_dir,
            }),
        }
    }

    /// State for serving uploads only, with no database attached.
    pub fn uploads_only(upload_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db: None,
                upload_dir,
            }),
        }
    }

    pub fn db(&self) -> Option<&Database> {
        self.inner.db.as_ref()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.inner.upload_dir
    }
}
