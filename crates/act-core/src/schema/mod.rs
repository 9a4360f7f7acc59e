//! Schema types for the team coordination file API.
//!
//! All types preserve unknown fields for forward compatibility and use
//! `camelCase` on the wire, `snake_case` in Rust.

mod inbox_message;
mod member;
mod payload;
mod task;
mod team_config;

pub use inbox_message::InboxMessage;
pub use member::{BackendKind, LeadMember, Member, TeammateMember};
pub use payload::{IdleNotification, ShutdownApproved, ShutdownRequest, TaskAssignment};
pub use task::{TaskItem, TaskStatus};
pub use team_config::TeamConfig;
