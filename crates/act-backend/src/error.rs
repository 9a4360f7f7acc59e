//! Error taxonomy for remote-agent HTTP calls and teammate-process launch.

use thiserror::Error;

/// Errors raised by [`crate::remote`] and [`crate::spawner`].
#[derive(Debug, Error)]
pub enum BackendError {
    /// The remote opencode server answered with an HTTP status we treat as
    /// an error (4xx/5xx), or some other unexpected status.
    #[error("{message}")]
    External {
        message: String,
        status: Option<u16>,
        body: String,
    },

    /// Launching or signalling a teammate process failed at the OS level
    /// (multiplexer binary missing, spawn failed, pane already gone).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-supplied configuration or arguments are invalid (reserved
    /// name, missing binary, missing server URL).
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type BackendResult<T> = Result<T, BackendError>;
