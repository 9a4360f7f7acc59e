//! Inbox/messaging: per-agent message queues and the shutdown/task-assignment
//! payload helpers layered on top of them.
//!
//! Grounded on `messaging.py`. One `.lock` file per team guards every
//! inbox under that team (`teams/{team}/inboxes/.lock`), not one lock per
//! agent — `read_inbox`'s mark-as-read path and `append_message` both take
//! it, so a read-and-flip never races a concurrent append.

use crate::error::CoreResult;
use crate::io::{acquire_lock, read_json, write_json_compact};
use crate::paths;
use crate::schema::{InboxMessage, ShutdownApproved, ShutdownRequest, TaskAssignment, TaskItem};
use std::path::Path;

const LOCK_RETRIES: u32 = 5;

pub fn now_iso() -> String {
    let now = chrono::Utc::now();
    format!("{}Z", now.format("%Y-%m-%dT%H:%M:%S%.3f"))
}

pub fn ensure_inbox(team_name: &str, agent_name: &str, base_dir: Option<&Path>) -> CoreResult<std::path::PathBuf> {
    let path = paths::inbox_path(team_name, agent_name, base_dir)
        .map_err(|e| crate::error::CoreError::InvalidInput(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| crate::error::CoreError::Io(crate::io::StoreError::Io { path: parent.to_path_buf(), source: e }))?;
    }
    if !path.exists() {
        write_json_compact(&path, &Vec::<InboxMessage>::new())?;
    }
    Ok(path)
}

/// Read an agent's inbox.
///
/// When `mark_as_read` is true, every message in the returned slice is
/// flipped to `read = true` on disk, even messages that were already read —
/// a non-empty result is always rewritten rather than diffed against what
/// changed.
pub fn read_inbox(
    team_name: &str,
    agent_name: &str,
    unread_only: bool,
    mark_as_read: bool,
    base_dir: Option<&Path>,
) -> CoreResult<Vec<InboxMessage>> {
    let path = paths::inbox_path(team_name, agent_name, base_dir)
        .map_err(|e| crate::error::CoreError::InvalidInput(e.to_string()))?;
    if !path.exists() {
        return Ok(Vec::new());
    }

    if mark_as_read {
        let lock_path = paths::inbox_lock_path(team_name, base_dir)
            .map_err(|e| crate::error::CoreError::InvalidInput(e.to_string()))?;
        let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

        let mut all_msgs: Vec<InboxMessage> = read_json(&path)?;
        let result: Vec<InboxMessage> = if unread_only {
            all_msgs.iter().filter(|m| !m.read).cloned().collect()
        } else {
            all_msgs.clone()
        };

        if !result.is_empty() {
            if unread_only {
                for m in all_msgs.iter_mut().filter(|m| !m.read) {
                    m.read = true;
                }
            } else {
                for m in all_msgs.iter_mut() {
                    m.read = true;
                }
            }
            write_json_compact(&path, &all_msgs)?;
        }

        Ok(result)
    } else {
        let all_msgs: Vec<InboxMessage> = read_json(&path)?;
        if unread_only {
            Ok(all_msgs.into_iter().filter(|m| !m.read).collect())
        } else {
            Ok(all_msgs)
        }
    }
}

pub fn append_message(
    team_name: &str,
    agent_name: &str,
    message: InboxMessage,
    base_dir: Option<&Path>,
) -> CoreResult<()> {
    let path = ensure_inbox(team_name, agent_name, base_dir)?;
    let lock_path = paths::inbox_lock_path(team_name, base_dir)
        .map_err(|e| crate::error::CoreError::InvalidInput(e.to_string()))?;
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

    let mut messages: Vec<InboxMessage> = read_json(&path)?;
    messages.push(message);
    write_json_compact(&path, &messages)?;
    Ok(())
}

pub fn send_plain_message(
    team_name: &str,
    from: &str,
    to: &str,
    text: &str,
    summary: Option<String>,
    color: Option<String>,
    base_dir: Option<&Path>,
) -> CoreResult<()> {
    let message = InboxMessage {
        from: from.to_string(),
        text: text.to_string(),
        timestamp: now_iso(),
        read: false,
        summary,
        color,
        unknown_fields: Default::default(),
    };
    append_message(team_name, to, message, base_dir)
}

fn send_structured_message(
    team_name: &str,
    from: &str,
    to: &str,
    payload_text: String,
    base_dir: Option<&Path>,
) -> CoreResult<()> {
    let message = InboxMessage {
        from: from.to_string(),
        text: payload_text,
        timestamp: now_iso(),
        read: false,
        summary: None,
        color: None,
        unknown_fields: Default::default(),
    };
    append_message(team_name, to, message, base_dir)
}

pub fn send_task_assignment(
    team_name: &str,
    task: &TaskItem,
    assigned_by: &str,
    base_dir: Option<&Path>,
) -> CoreResult<()> {
    let owner = task.owner.clone().ok_or_else(|| {
        crate::error::CoreError::InvalidInput("cannot assign a task with no owner".to_string())
    })?;
    let payload = TaskAssignment::new(
        task.id.clone(),
        task.subject.clone(),
        task.description.clone(),
        assigned_by.to_string(),
        now_iso(),
    );
    let text = serde_json::to_string(&payload)
        .map_err(|e| crate::error::CoreError::Io(crate::io::StoreError::Json { path: std::path::PathBuf::new(), source: e }))?;
    send_structured_message(team_name, assigned_by, &owner, text, base_dir)
}

/// Returns the generated `request_id`, formatted as `shutdown-{epoch_ms}@{recipient}`.
pub fn send_shutdown_request(
    team_name: &str,
    recipient: &str,
    reason: &str,
    base_dir: Option<&Path>,
) -> CoreResult<String> {
    let request_id = format!("shutdown-{}@{recipient}", chrono::Utc::now().timestamp_millis());
    let payload = ShutdownRequest::new(request_id.clone(), "team-lead".to_string(), reason.to_string(), now_iso());
    let text = serde_json::to_string(&payload)
        .map_err(|e| crate::error::CoreError::Io(crate::io::StoreError::Json { path: std::path::PathBuf::new(), source: e }))?;
    send_structured_message(team_name, "team-lead", recipient, text, base_dir)?;
    Ok(request_id)
}

/// Notify `team-lead` that `from`'s shutdown request has been carried out.
pub fn send_shutdown_approved(
    team_name: &str,
    request_id: &str,
    from: &str,
    multiplexer_target_id: &str,
    backend_kind: &str,
    session_id: Option<String>,
    base_dir: Option<&Path>,
) -> CoreResult<()> {
    let payload = ShutdownApproved::new(
        request_id.to_string(),
        from.to_string(),
        now_iso(),
        multiplexer_target_id.to_string(),
        backend_kind.to_string(),
        session_id,
    );
    let text = serde_json::to_string(&payload)
        .map_err(|e| crate::error::CoreError::Io(crate::io::StoreError::Json { path: std::path::PathBuf::new(), source: e }))?;
    send_structured_message(team_name, from, "team-lead", text, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) {
        std::fs::create_dir_all(dir.path().join("teams/demo")).unwrap();
    }

    #[test]
    fn append_and_read_round_trips() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        send_plain_message("demo", "team-lead", "poet", "hello", Some("greet".into()), None, Some(dir.path())).unwrap();

        let msgs = read_inbox("demo", "poet", false, false, Some(dir.path())).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].text, "hello");
        assert!(!msgs[0].read);
    }

    #[test]
    fn read_inbox_marks_messages_read() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        send_plain_message("demo", "team-lead", "poet", "hello", None, None, Some(dir.path())).unwrap();

        let unread = read_inbox("demo", "poet", true, true, Some(dir.path())).unwrap();
        assert_eq!(unread.len(), 1);

        let again = read_inbox("demo", "poet", true, true, Some(dir.path())).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn reading_already_read_messages_is_a_documented_no_op() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        send_plain_message("demo", "team-lead", "poet", "hello", None, None, Some(dir.path())).unwrap();
        let _ = read_inbox("demo", "poet", true, true, Some(dir.path())).unwrap();

        // unread_only=false, mark_as_read=true: re-reads and re-flips already-read
        // messages, which is a no-op write, not an error.
        let all = read_inbox("demo", "poet", false, true, Some(dir.path())).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].read);
    }

    #[test]
    fn missing_inbox_returns_empty() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let msgs = read_inbox("demo", "nobody", false, true, Some(dir.path())).unwrap();
        assert!(msgs.is_empty());
    }

    #[test]
    fn shutdown_request_id_is_scoped_to_recipient() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = send_shutdown_request("demo", "poet", "done", Some(dir.path())).unwrap();
        assert!(id.starts_with("shutdown-"));
        assert!(id.ends_with("@poet"));
    }

    #[test]
    fn shutdown_approved_lands_in_team_lead_inbox() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        send_shutdown_approved("demo", "shutdown-1@poet", "poet", "%3", "claude", None, Some(dir.path())).unwrap();

        let msgs = read_inbox("demo", "team-lead", false, false, Some(dir.path())).unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].text.contains("shutdown_approved"));
    }
}
