//! Tool-handler boundary: one function per MCP tool in `server.py`, wired
//! directly to `act-core`/`act-backend` with no transport dependency.
//!
//! A caller (an MCP stdio server, an HTTP proxy, a CLI) owns the
//! [`crate::session::Session`] and is responsible for calling these
//! functions in response to whatever wire protocol it speaks.

use crate::error::{ToolError, ToolErrorKind, ToolResult};
use crate::result::{RoutingEnvelope, SendMessageResult, SimpleResult, SpawnResult};
use crate::session::Session;
use act_backend::config::BackendConfig;
use act_backend::spawner::{self, SpawnOptions};
use act_core::schema::{BackendKind, Member, TaskItem, TaskStatus};
use act_core::{inbox, task, team};
use std::path::Path;
use std::time::{Duration, Instant};

pub fn team_create(
    session: &mut Session,
    team_name: &str,
    description: &str,
    lead_model: &str,
    cwd: &Path,
    base_dir: Option<&Path>,
) -> ToolResult<team::TeamCreateResult> {
    session.set_active_team(team_name)?;
    team::create_team(team_name, &session.session_id, description, lead_model, cwd, base_dir).map_err(Into::into)
}

pub fn team_delete(team_name: &str, base_dir: Option<&Path>) -> ToolResult<team::TeamDeleteResult> {
    team::delete_team(team_name, base_dir).map_err(Into::into)
}

/// Resolves which backend a spawn uses: an explicit `backend` argument if
/// given and enabled, otherwise the first entry of `CLAUDE_TEAMS_BACKENDS`
/// (`claude` if unset).
pub fn spawn_teammate_tool(
    session: &Session,
    team_name: &str,
    name: &str,
    prompt: &str,
    model: Option<&str>,
    subagent_type: Option<&str>,
    plan_mode_required: bool,
    backend: Option<&str>,
    base_dir: Option<&Path>,
) -> ToolResult<SpawnResult> {
    let config = BackendConfig::from_env();
    let backend_name = match backend {
        Some(b) => b.to_string(),
        None => config.enabled_backends.first().cloned().unwrap_or_else(|| "claude".to_string()),
    };
    if !config.supports(&backend_name) {
        return Err(ToolError::new(
            ToolErrorKind::InvalidInput,
            format!("backend {backend_name:?} is not enabled (see CLAUDE_TEAMS_BACKENDS)"),
        ));
    }
    let backend_kind = match backend_name.as_str() {
        "opencode" => BackendKind::Opencode,
        _ => BackendKind::Claude,
    };
    let opts = SpawnOptions {
        model: model.unwrap_or("sonnet").to_string(),
        subagent_type: subagent_type.unwrap_or("general-purpose").to_string(),
        plan_mode_required,
        backend_kind,
        opencode_binary: session.opencode_binary.clone(),
        opencode_server_url: config.opencode_server_url.clone(),
        ..Default::default()
    };
    let member = spawner::spawn_teammate(
        team_name,
        name,
        prompt,
        session.claude_binary.as_deref(),
        &session.session_id,
        opts,
        base_dir,
    )?;
    Ok(SpawnResult { agent_id: member.agent_id, name: member.name, team_name: team_name.to_string() })
}

/// Dispatch target for [`send_message`], mirroring `server.py`'s `type` literal union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Message,
    Broadcast,
    ShutdownRequest,
    ShutdownResponse,
    PlanApprovalResponse,
}

impl MessageKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "message" => Some(MessageKind::Message),
            "broadcast" => Some(MessageKind::Broadcast),
            "shutdown_request" => Some(MessageKind::ShutdownRequest),
            "shutdown_response" => Some(MessageKind::ShutdownResponse),
            "plan_approval_response" => Some(MessageKind::PlanApprovalResponse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendMessageRequest {
    pub recipient: String,
    pub content: String,
    pub summary: String,
    pub request_id: String,
    pub approve: Option<bool>,
    pub sender: String,
}

fn find_member<'a>(config: &'a act_core::TeamConfig, name: &str) -> Option<&'a Member> {
    config.members.iter().find(|m| m.name() == name)
}

fn require_member<'a>(config: &'a act_core::TeamConfig, team_name: &str, name: &str) -> ToolResult<&'a Member> {
    find_member(config, name).ok_or_else(|| {
        ToolError::new(ToolErrorKind::NotFound, format!("{name:?} is not a member of team {team_name:?}"))
    })
}

fn member_color(member: &Member) -> Option<String> {
    match member {
        Member::Teammate(t) => Some(t.color.clone()),
        Member::Lead(_) => None,
    }
}

/// Best-effort push of a message to a remote opencode session; failures are
/// logged and swallowed, never surfaced to the caller of `send_message`.
fn push_remote_best_effort(member: &Member, text: &str) {
    let Member::Teammate(teammate) = member else { return };
    if teammate.backend_kind != BackendKind::Opencode {
        return;
    }
    let Some(session_id) = teammate.remote_session_id.as_deref() else { return };
    let Some(server_url) = BackendConfig::from_env().opencode_server_url else { return };
    if let Err(e) = act_backend::remote::send_prompt_async(&server_url, session_id, text, None) {
        tracing::warn!(agent = %teammate.name, session_id, error = %e, "best-effort remote push failed");
    }
}

pub fn send_message(
    team_name: &str,
    kind: &str,
    req: SendMessageRequest,
    base_dir: Option<&Path>,
) -> ToolResult<SendMessageResult> {
    let kind = MessageKind::parse(kind)
        .ok_or_else(|| ToolError::new(ToolErrorKind::InvalidInput, format!("unknown message type: {kind}")))?;
    let sender = if req.sender.is_empty() { "team-lead".to_string() } else { req.sender };

    match kind {
        MessageKind::Message => {
            if req.content.trim().is_empty() || req.summary.trim().is_empty() || req.recipient.trim().is_empty() {
                return Err(ToolError::new(
                    ToolErrorKind::InvalidInput,
                    "message requires non-empty content, summary, and recipient",
                ));
            }
            if sender == req.recipient {
                return Err(ToolError::new(ToolErrorKind::Precondition, "cannot send a message to yourself"));
            }
            if sender != "team-lead" && req.recipient != "team-lead" {
                return Err(ToolError::new(
                    ToolErrorKind::Precondition,
                    "direct messages between teammates are forbidden: one party must be team-lead",
                ));
            }
            let config = team::read_config(team_name, base_dir)?;
            require_member(&config, team_name, &sender)?;
            let recipient_member = require_member(&config, team_name, &req.recipient)?;
            let target_color = member_color(recipient_member);

            inbox::send_plain_message(
                team_name,
                &sender,
                &req.recipient,
                &req.content,
                Some(req.summary.clone()),
                target_color.clone(),
                base_dir,
            )?;
            push_remote_best_effort(recipient_member, &req.content);

            Ok(SendMessageResult {
                success: true,
                message: format!("Message sent to {}", req.recipient),
                routing: Some(RoutingEnvelope {
                    sender: sender.clone(),
                    target: req.recipient,
                    target_color,
                    summary: req.summary,
                    content: req.content,
                }),
                ..Default::default()
            })
        }
        MessageKind::Broadcast => {
            if sender != "team-lead" {
                return Err(ToolError::new(ToolErrorKind::Precondition, "only team-lead may broadcast"));
            }
            let config = team::read_config(team_name, base_dir)?;
            let mut count = 0;
            for m in &config.members {
                if let Member::Teammate(t) = m {
                    inbox::send_plain_message(
                        team_name,
                        "team-lead",
                        &t.name,
                        &req.content,
                        Some(req.summary.clone()),
                        Some(t.color.clone()),
                        base_dir,
                    )?;
                    push_remote_best_effort(m, &req.content);
                    count += 1;
                }
            }
            Ok(SendMessageResult { success: true, message: format!("Broadcast sent to {count} teammate(s)"), ..Default::default() })
        }
        MessageKind::ShutdownRequest => {
            if req.recipient == "team-lead" {
                return Err(ToolError::new(ToolErrorKind::InvalidInput, "cannot send a shutdown request to team-lead"));
            }
            let config = team::read_config(team_name, base_dir)?;
            let recipient_member = require_member(&config, team_name, &req.recipient)?;

            let request_id = inbox::send_shutdown_request(team_name, &req.recipient, &req.content, base_dir)?;
            push_remote_best_effort(recipient_member, &req.content);
            Ok(SendMessageResult {
                success: true,
                message: format!("Shutdown request sent to {}", req.recipient),
                request_id: Some(request_id),
                target: Some(req.recipient),
                ..Default::default()
            })
        }
        MessageKind::ShutdownResponse => {
            let config = team::read_config(team_name, base_dir)?;
            let member = config.members.iter().find_map(|m| match m {
                Member::Teammate(t) if t.name == sender => Some(t.clone()),
                _ => None,
            });
            let Some(member) = member else {
                return Err(ToolError::new(
                    ToolErrorKind::NotFound,
                    format!("{sender:?} is not a teammate of team {team_name:?}"),
                ));
            };
            if req.approve == Some(true) {
                let multiplexer_target_id = member.multiplexer_target_id.clone();
                let backend_kind = member.backend_kind.to_string();
                let remote_session_id = member.remote_session_id.clone();
                inbox::send_shutdown_approved(
                    team_name,
                    &req.request_id,
                    &sender,
                    &multiplexer_target_id,
                    &backend_kind,
                    remote_session_id,
                    base_dir,
                )?;
                Ok(SendMessageResult { success: true, message: format!("Shutdown approved for request {}", req.request_id), ..Default::default() })
            } else {
                let text = if req.content.is_empty() { "Shutdown rejected".to_string() } else { req.content };
                inbox::send_plain_message(team_name, &sender, "team-lead", &text, Some("shutdown_rejected".to_string()), None, base_dir)?;
                Ok(SendMessageResult { success: true, message: format!("Shutdown rejected for request {}", req.request_id), ..Default::default() })
            }
        }
        MessageKind::PlanApprovalResponse => {
            let config = team::read_config(team_name, base_dir)?;
            require_member(&config, team_name, &sender)?;
            require_member(&config, team_name, &req.recipient)?;

            if req.approve == Some(true) {
                inbox::send_plain_message(
                    team_name,
                    &sender,
                    &req.recipient,
                    "{\"type\":\"plan_approval\",\"approved\":true}",
                    Some("plan_approved".to_string()),
                    None,
                    base_dir,
                )?;
            } else {
                let text = if req.content.is_empty() { "Plan rejected".to_string() } else { req.content };
                inbox::send_plain_message(team_name, &sender, &req.recipient, &text, Some("plan_rejected".to_string()), None, base_dir)?;
            }
            let verb = if req.approve == Some(true) { "approved" } else { "rejected" };
            Ok(SendMessageResult { success: true, message: format!("Plan {verb} for {}", req.recipient), ..Default::default() })
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskCreateRequest {
    pub subject: String,
    pub description: String,
    pub active_form: String,
    pub metadata: Option<std::collections::HashMap<String, serde_json::Value>>,
}

pub fn task_create(team_name: &str, req: TaskCreateRequest, base_dir: Option<&Path>) -> ToolResult<TaskItem> {
    task::create_task(team_name, &req.subject, &req.description, &req.active_form, req.metadata, base_dir).map_err(Into::into)
}

pub fn task_update(team_name: &str, task_id: &str, update: task::TaskUpdate, base_dir: Option<&Path>) -> ToolResult<TaskItem> {
    let owner_set = update.owner.is_some();
    let updated = task::update_task(team_name, task_id, update, base_dir)?;
    if owner_set && updated.owner.is_some() && updated.status != TaskStatus::Deleted {
        inbox::send_task_assignment(team_name, &updated, "team-lead", base_dir)?;
    }
    Ok(updated)
}

pub fn task_list(team_name: &str, base_dir: Option<&Path>) -> ToolResult<Vec<TaskItem>> {
    task::list_tasks(team_name, base_dir).map_err(Into::into)
}

pub fn task_get(team_name: &str, task_id: &str, base_dir: Option<&Path>) -> ToolResult<TaskItem> {
    task::get_task(team_name, task_id, base_dir).map_err(Into::into)
}

pub fn read_inbox(
    team_name: &str,
    agent_name: &str,
    unread_only: bool,
    mark_as_read: bool,
    base_dir: Option<&Path>,
) -> ToolResult<Vec<act_core::InboxMessage>> {
    inbox::read_inbox(team_name, agent_name, unread_only, mark_as_read, base_dir).map_err(Into::into)
}

pub fn read_config(team_name: &str, base_dir: Option<&Path>) -> ToolResult<act_core::TeamConfig> {
    team::read_config(team_name, base_dir).map_err(Into::into)
}

pub fn force_kill_teammate(team_name: &str, agent_name: &str, base_dir: Option<&Path>) -> ToolResult<SimpleResult> {
    let config = team::read_config(team_name, base_dir)?;
    let pane_id = config.members.iter().find_map(|m| match m {
        Member::Teammate(t) if t.name == agent_name => Some(t.multiplexer_target_id.clone()),
        _ => None,
    });
    let Some(pane_id) = pane_id else {
        return Err(ToolError::new(
            ToolErrorKind::NotFound,
            format!("teammate {agent_name:?} not found in team {team_name:?}"),
        ));
    };
    if !pane_id.is_empty() {
        spawner::kill_tmux_pane(&pane_id);
    }
    team::remove_member(team_name, agent_name, base_dir)?;
    task::reset_owner_tasks(team_name, agent_name, base_dir)?;
    Ok(SimpleResult { success: true, message: format!("{agent_name} has been stopped.") })
}

const POLL_SLICE: Duration = Duration::from_millis(500);

/// Poll an agent's inbox for unread messages, sleeping in 500ms slices up to
/// `timeout_ms`. Returns as soon as any unread message appears, or an empty
/// list once the deadline passes.
pub fn poll_inbox(
    team_name: &str,
    agent_name: &str,
    timeout_ms: u64,
    base_dir: Option<&Path>,
) -> ToolResult<Vec<act_core::InboxMessage>> {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        let msgs = inbox::read_inbox(team_name, agent_name, true, true, base_dir)?;
        if !msgs.is_empty() {
            return Ok(msgs);
        }
        if Instant::now() >= deadline {
            return Ok(Vec::new());
        }
        std::thread::sleep(POLL_SLICE.min(deadline.saturating_duration_since(Instant::now())));
    }
}

pub fn process_shutdown_approved(team_name: &str, agent_name: &str, base_dir: Option<&Path>) -> ToolResult<SimpleResult> {
    team::remove_member(team_name, agent_name, base_dir)?;
    task::reset_owner_tasks(team_name, agent_name, base_dir)?;
    Ok(SimpleResult { success: true, message: format!("{agent_name} removed from team.") })
}
