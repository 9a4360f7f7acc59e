//! Leaf error type for filesystem operations under `act-core`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the atomic-write, lock, and path-resolution helpers in
/// [`crate::io`]. Every higher-level module (team registry, inbox, task
/// engine) wraps this as `CoreError::Io`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to acquire lock on {path:?} after {retries} retries")]
    LockTimeout { path: PathBuf, retries: u32 },

    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid path: {0:?}")]
    InvalidPath(PathBuf),
}
