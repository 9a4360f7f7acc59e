//! Structured payloads embedded (as JSON text) in an [`super::InboxMessage`]'s
//! `text` field. Each carries its own `type` tag so a recipient can dispatch
//! without first knowing what kind of message arrived.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleNotification {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub from: String,
    pub timestamp: String,
    pub idle_reason: String,
}

impl IdleNotification {
    pub fn new(from: String, timestamp: String, idle_reason: String) -> Self {
        IdleNotification { kind: "idle_notification", from, timestamp, idle_reason }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub task_id: String,
    pub subject: String,
    pub description: String,
    pub assigned_by: String,
    pub timestamp: String,
}

impl TaskAssignment {
    pub fn new(
        task_id: String,
        subject: String,
        description: String,
        assigned_by: String,
        timestamp: String,
    ) -> Self {
        TaskAssignment { kind: "task_assignment", task_id, subject, description, assigned_by, timestamp }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownRequest {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub request_id: String,
    pub from: String,
    pub reason: String,
    pub timestamp: String,
}

impl ShutdownRequest {
    pub fn new(request_id: String, from: String, reason: String, timestamp: String) -> Self {
        ShutdownRequest { kind: "shutdown_request", request_id, from, reason, timestamp }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownApproved {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub request_id: String,
    pub from: String,
    pub timestamp: String,
    pub multiplexer_target_id: String,
    pub backend_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ShutdownApproved {
    pub fn new(
        request_id: String,
        from: String,
        timestamp: String,
        multiplexer_target_id: String,
        backend_kind: String,
        session_id: Option<String>,
    ) -> Self {
        ShutdownApproved {
            kind: "shutdown_approved",
            request_id,
            from,
            timestamp,
            multiplexer_target_id,
            backend_kind,
            session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_assignment_carries_type_tag() {
        let payload = TaskAssignment::new(
            "1".into(),
            "subject".into(),
            "desc".into(),
            "team-lead".into(),
            "2026-02-11T14:30:00.000Z".into(),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("task_assignment"));
        assert_eq!(value.get("taskId").and_then(|v| v.as_str()), Some("1"));
    }

    #[test]
    fn shutdown_approved_omits_session_id_when_absent() {
        let payload = ShutdownApproved::new(
            "shutdown-1@poet".into(),
            "poet".into(),
            "2026-02-11T14:30:00.000Z".into(),
            "%14".into(),
            "claude".into(),
            None,
        );
        let serialized = serde_json::to_string(&payload).unwrap();
        assert!(!serialized.contains("sessionId"));
    }
}
