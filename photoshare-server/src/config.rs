//! Server configuration - bind address, upload root, CORS and timeouts
//!
//! The CLI fills this from flags and environment (`UPLOAD_DIR`,
//! default ./public/uploads).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upload directory relative to the working directory when `UPLOAD_DIR` is unset.
pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Absolute directory beneath which every served file must resolve
    pub upload_dir: PathBuf,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Build a config with the default bind address and the given upload root.
    pub fn with_upload_dir(upload_dir: impl AsRef<Path>) -> Self {
        Self {
            upload_dir: absolute_upload_dir(upload_dir.as_ref()),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            upload_dir: absolute_upload_dir(Path::new(DEFAULT_UPLOAD_DIR)),
            cors_permissive: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Anchor a relative upload directory at the current working directory.
///
/// The directory does not have to exist yet; canonicalization happens per
/// request in [`crate::uploads`].
pub fn absolute_upload_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }

    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(e) => {
            tracing::warn!(error = %e, "could not read working directory, using relative upload dir");
            dir.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(!config.cors_permissive);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.upload_dir.is_absolute());
        assert!(config.upload_dir.ends_with("public/uploads"));
    }

    #[test]
    fn absolute_dir_is_kept() {
        let config = ServerConfig::with_upload_dir("/srv/photos");
        assert_eq!(config.upload_dir, PathBuf::from("/srv/photos"));
    }
}
