//! photoshare-server: upload serving and database access
//!
//! Two independent pieces hosted behind one axum router:
//! - `uploads`: streams stored images from the upload root
//! - `db`: lazily provisioned Postgres tables behind `all`/`get`/`run`

pub mod config;
pub mod db;
pub mod http;
pub mod state;
pub mod uploads;

pub use config::ServerConfig;
pub use db::{Database, DbError, Param, Record};
pub use http::{build_router, run_server, ServerError};
pub use state::AppState;
pub use uploads::{serve_upload, UploadError, UploadedFile};
