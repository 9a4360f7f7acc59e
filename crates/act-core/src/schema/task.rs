//! Task schema: one JSON file per task under `tasks/{team}/{id}.json`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Monotone lifecycle state of a task. `Deleted` is reachable from any state
/// and is terminal; the others only move forward (`Pending < InProgress <
/// Completed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Deleted,
}

impl TaskStatus {
    /// Ordinal used for monotonicity checks. `Deleted` has no ordinal — it
    /// bypasses the ordering entirely rather than sitting above `Completed`.
    pub fn order(self) -> Option<u8> {
        match self {
            TaskStatus::Pending => Some(0),
            TaskStatus::InProgress => Some(1),
            TaskStatus::Completed => Some(2),
            TaskStatus::Deleted => None,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// A single task in a team's dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub active_form: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub blocks: Vec<String>,
    #[serde(default)]
    pub blocked_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl TaskItem {
    pub fn new(id: String, subject: String, description: String, active_form: String) -> Self {
        TaskItem {
            id,
            subject,
            description,
            active_form,
            status: TaskStatus::Pending,
            blocks: Vec::new(),
            blocked_by: Vec::new(),
            owner: None,
            metadata: None,
            unknown_fields: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering_is_monotone_except_deleted() {
        assert!(TaskStatus::Pending.order() < TaskStatus::InProgress.order());
        assert!(TaskStatus::InProgress.order() < TaskStatus::Completed.order());
        assert_eq!(TaskStatus::Deleted.order(), None);
    }

    #[test]
    fn round_trips_with_blocked_by_alias() {
        let json = r#"{
            "id": "1",
            "subject": "write docs",
            "description": "",
            "status": "pending",
            "blocks": [],
            "blockedBy": ["2"]
        }"#;
        let task: TaskItem = serde_json::from_str(json).unwrap();
        assert_eq!(task.blocked_by, vec!["2".to_string()]);

        let serialized = serde_json::to_string(&task).unwrap();
        assert!(serialized.contains("\"blockedBy\""));
    }

    #[test]
    fn omits_owner_and_metadata_when_absent() {
        let task = TaskItem::new("1".into(), "s".into(), "d".into(), String::new());
        let serialized = serde_json::to_string(&task).unwrap();
        assert!(!serialized.contains("owner"));
        assert!(!serialized.contains("metadata"));
    }
}
