//! Error types for command execution

use thiserror::Error;

/// Command execution errors
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Tool(String),

    #[error("Team '{team}' not found (directory ~/.claude/teams/{team}/ doesn't exist)")]
    TeamNotFound { team: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<act_handler::ToolError> for CommandError {
    fn from(err: act_handler::ToolError) -> Self {
        CommandError::Tool(err.message)
    }
}

impl From<act_core::CoreError> for CommandError {
    fn from(err: act_core::CoreError) -> Self {
        CommandError::Tool(err.to_string())
    }
}

impl From<act_backend::BackendError> for CommandError {
    fn from(err: act_backend::BackendError) -> Self {
        CommandError::Tool(err.to_string())
    }
}
