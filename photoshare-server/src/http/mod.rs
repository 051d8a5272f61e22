//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing and timeouts
//! - Graceful shutdown

pub mod routes;
pub mod server;

pub use server::{build_router, run_server, ServerError};
