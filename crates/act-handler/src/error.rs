//! Uniform error envelope surfaced to tool callers.
//!
//! Library errors (`CoreError`, `BackendError`) carry rich detail internally,
//! but a transport only ever sees one flat `ToolError` — tracebacks never
//! leak across the boundary. The `kind` field preserves just enough of that
//! detail for a caller to branch on (retry a `conflict`, surface an
//! `invalid-input` to the user, log an `external` failure) without parsing
//! the message string.

use act_backend::BackendError;
use act_core::CoreError;
use thiserror::Error;

/// Coarse error classification surfaced alongside [`ToolError::message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    InvalidInput,
    Precondition,
    NotFound,
    Conflict,
    External,
    Io,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolErrorKind::InvalidInput => "invalid-input",
            ToolErrorKind::Precondition => "precondition",
            ToolErrorKind::NotFound => "not-found",
            ToolErrorKind::Conflict => "conflict",
            ToolErrorKind::External => "external",
            ToolErrorKind::Io => "io",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ToolError {
    pub message: String,
    pub kind: ToolErrorKind,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        ToolError { message: message.into(), kind }
    }
}

impl From<CoreError> for ToolError {
    fn from(e: CoreError) -> Self {
        let kind = match &e {
            CoreError::InvalidInput(_) => ToolErrorKind::InvalidInput,
            CoreError::Precondition(_) => ToolErrorKind::Precondition,
            CoreError::NotFound(_) => ToolErrorKind::NotFound,
            CoreError::Conflict(_) => ToolErrorKind::Conflict,
            CoreError::Io(_) => ToolErrorKind::Io,
        };
        ToolError::new(kind, e.to_string())
    }
}

impl From<BackendError> for ToolError {
    fn from(e: BackendError) -> Self {
        let kind = match &e {
            BackendError::External { .. } => ToolErrorKind::External,
            BackendError::Io(_) => ToolErrorKind::Io,
            BackendError::Invalid(_) => ToolErrorKind::InvalidInput,
        };
        ToolError::new(kind, e.to_string())
    }
}

pub type ToolResult<T> = Result<T, ToolError>;
