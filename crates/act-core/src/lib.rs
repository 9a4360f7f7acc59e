//! Core library for act: file-backed coordination for autonomous coding-agent
//! teams via the file-based layout at `~/.claude/teams/` and `~/.claude/tasks/`.
//!
//! All schema types are designed to:
//! - Preserve unknown fields for forward compatibility
//! - Use proper serde configuration for camelCase <-> snake_case
//! - Support round-trip serialization without data loss

pub mod error;
pub mod home;
pub mod inbox;
pub mod io;
pub mod logging;
pub mod paths;
pub mod schema;
pub mod task;
pub mod team;
pub mod text;

pub use error::{CoreError, CoreResult};
pub use schema::{
    BackendKind, IdleNotification, InboxMessage, LeadMember, Member, ShutdownApproved,
    ShutdownRequest, TaskAssignment, TaskItem, TaskStatus, TeamConfig, TeammateMember,
};
pub use team::{TeamCreateResult, TeamDeleteResult};
