//! Domain error taxonomy shared by the team registry, inbox, and task engine.

use crate::io::StoreError;
use thiserror::Error;

/// The uniform "error kind" surfaced by every `act-core` operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-supplied data failed validation (bad name, empty subject, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request is well-formed but violates an invariant given current
    /// state (cycle, reserved name, non-monotone transition, blocked task).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A referenced team, task, or member does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested mutation conflicts with existing state (duplicate name,
    /// team already has active teammates).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying filesystem operation failed.
    #[error(transparent)]
    Io(#[from] StoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
