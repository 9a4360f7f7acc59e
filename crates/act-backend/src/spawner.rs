//! Teammate process launch: tmux pane/window spawning, command construction,
//! and color assignment.
//!
//! Grounded on `spawner.py`. A spawn is multi-step and not atomic at the OS
//! level (add member, seed inbox, maybe create a remote session, exec tmux),
//! so on any failure the whole chain is rolled back best-effort rather than
//! left half-applied.

use crate::error::{BackendError, BackendResult};
use crate::remote;
use act_core::schema::{BackendKind, Member, TeammateMember};
use act_core::{inbox, team, CoreError};
use std::path::Path;
use std::process::Command;

pub const COLOR_PALETTE: [&str; 8] =
    ["blue", "green", "yellow", "purple", "orange", "pink", "cyan", "red"];

const OPENCODE_PROMPT_WRAPPER: &str = "You are team member '{name}' on team '{team_name}'.

You have MCP tools from the claude-teams server for team coordination:
- poll_inbox(team_name=\"{team_name}\", agent_name=\"{name}\") - Check for new messages
- send_message(team_name=\"{team_name}\", type=\"message\", sender=\"{name}\", recipient=\"team-lead\", content=\"...\", summary=\"...\") - Message teammates
- task_list(team_name=\"{team_name}\") - View team tasks
- task_update(team_name=\"{team_name}\", task_id=\"...\", status=\"...\") - Update task status
- task_get(team_name=\"{team_name}\", task_id=\"...\") - Get task details

IMPORTANT: Only read your own inbox (agent_name=\"{name}\"). Reading another agent's inbox marks their messages as read and effectively hides them from the intended recipient.

Start by reading your inbox for instructions.

---

{prompt}";

fn render_opencode_prompt(name: &str, team_name: &str, prompt: &str) -> String {
    OPENCODE_PROMPT_WRAPPER
        .replace("{name}", name)
        .replace("{team_name}", team_name)
        .replace("{prompt}", prompt)
}

pub fn discover_harness_binary(name: &str) -> Option<String> {
    which(name)
}

fn which(name: &str) -> Option<String> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            Some(candidate.display().to_string())
        } else {
            None
        }
    })
}

pub fn use_tmux_windows() -> bool {
    std::env::var_os("USE_TMUX_WINDOWS").is_some()
}

/// Build the `tmux` argv used to spawn a teammate process. Returns the pane
/// id (`%N`) via `split-window`, or a window id (`@N`) via `new-window` when
/// `USE_TMUX_WINDOWS` is set.
pub fn build_tmux_spawn_args(command: &str, name: &str) -> Vec<String> {
    if use_tmux_windows() {
        vec![
            "tmux".to_string(),
            "new-window".to_string(),
            "-dP".to_string(),
            "-F".to_string(),
            "#{window_id}".to_string(),
            "-n".to_string(),
            format!("@claude-team | {name}"),
            command.to_string(),
        ]
    } else {
        vec![
            "tmux".to_string(),
            "split-window".to_string(),
            "-dP".to_string(),
            "-F".to_string(),
            "#{pane_id}".to_string(),
            command.to_string(),
        ]
    }
}

pub fn assign_color(team_name: &str, base_dir: Option<&Path>) -> BackendResult<String> {
    let config = team::read_config(team_name, base_dir).map_err(core_err)?;
    let count = config.members.iter().filter(|m| m.is_teammate()).count();
    Ok(COLOR_PALETTE[count % COLOR_PALETTE.len()].to_string())
}

fn shell_quote(s: &str) -> String {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'/' | b':' | b'@')) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

pub fn build_spawn_command(member: &TeammateMember, claude_binary: &str, lead_session_id: &str) -> String {
    let team_name = member.agent_id.split('@').nth(1).unwrap_or("");
    let mut cmd = format!(
        "cd {} && CLAUDECODE=1 CLAUDE_CODE_EXPERIMENTAL_AGENT_TEAMS=1 {} --agent-id {} --agent-name {} --team-name {} --agent-color {} --parent-session-id {} --agent-type {} --model {}",
        shell_quote(&member.cwd),
        shell_quote(claude_binary),
        shell_quote(&member.agent_id),
        shell_quote(&member.name),
        shell_quote(team_name),
        shell_quote(&member.color),
        shell_quote(lead_session_id),
        shell_quote(&member.agent_type),
        shell_quote(&member.model),
    );
    if member.plan_mode_required {
        cmd.push_str(" --plan-mode-required");
    }
    cmd
}

pub fn build_opencode_attach_command(opencode_binary: &str, server_url: &str, session_id: &str, cwd: &str) -> String {
    format!(
        "{} attach {} -s {} --dir {}",
        shell_quote(opencode_binary),
        shell_quote(server_url),
        shell_quote(session_id),
        shell_quote(cwd),
    )
}

fn core_err(e: CoreError) -> BackendError {
    BackendError::Invalid(e.to_string())
}

/// Options for spawning a new teammate. Defaults match the original: model
/// `"sonnet"`, subagent type `"general-purpose"`, claude backend.
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    pub model: String,
    pub subagent_type: String,
    pub cwd: Option<String>,
    pub plan_mode_required: bool,
    pub backend_kind: BackendKind,
    pub opencode_binary: Option<String>,
    pub opencode_server_url: Option<String>,
    pub opencode_agent: Option<String>,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        SpawnOptions {
            model: "sonnet".to_string(),
            subagent_type: "general-purpose".to_string(),
            cwd: None,
            plan_mode_required: false,
            backend_kind: BackendKind::Claude,
            opencode_binary: None,
            opencode_server_url: None,
            opencode_agent: None,
        }
    }
}

pub fn spawn_teammate(
    team_name: &str,
    name: &str,
    prompt: &str,
    claude_binary: Option<&str>,
    lead_session_id: &str,
    opts: SpawnOptions,
    base_dir: Option<&Path>,
) -> BackendResult<TeammateMember> {
    if name == "team-lead" {
        return Err(BackendError::Invalid("agent name 'team-lead' is reserved".to_string()));
    }
    team::validate_name("teammate", name).map_err(core_err)?;
    match opts.backend_kind {
        BackendKind::Opencode => {
            if opts.opencode_binary.is_none() {
                return Err(BackendError::Invalid(
                    "cannot spawn opencode teammate: 'opencode' binary not found on PATH. Install OpenCode or ensure it is in your PATH.".to_string(),
                ));
            }
            if opts.opencode_server_url.is_none() {
                return Err(BackendError::Invalid(
                    "cannot spawn opencode teammate: OPENCODE_SERVER_URL is not set. Start 'opencode serve' and set the environment variable.".to_string(),
                ));
            }
        }
        BackendKind::Claude => {
            if claude_binary.is_none() {
                return Err(BackendError::Invalid(
                    "cannot spawn claude teammate: 'claude' binary not found on PATH. Install Claude Code or ensure it is in your PATH.".to_string(),
                ));
            }
        }
    }

    let resolved_cwd = opts
        .cwd
        .clone()
        .unwrap_or_else(|| std::env::current_dir().map(|p| p.display().to_string()).unwrap_or_default());

    let mut opencode_session_id: Option<String> = None;
    if opts.backend_kind == BackendKind::Opencode {
        let server_url = opts.opencode_server_url.as_deref().expect("checked above");
        remote::verify_mcp_configured(server_url)?;
        let permissions = serde_json::json!([{ "permission": "*", "pattern": "*", "action": "allow" }]);
        opencode_session_id = Some(remote::create_session(server_url, &format!("{name}@{team_name}"), Some(permissions))?);
    }

    let color = assign_color(team_name, base_dir)?;
    let now_ms = chrono::Utc::now().timestamp_millis();

    let mut member = TeammateMember {
        agent_id: format!("{name}@{team_name}"),
        name: name.to_string(),
        agent_type: opts.subagent_type.clone(),
        model: opts.model.clone(),
        prompt: prompt.to_string(),
        color,
        plan_mode_required: opts.plan_mode_required,
        joined_at: now_ms,
        multiplexer_target_id: String::new(),
        cwd: resolved_cwd.clone(),
        subscriptions: Vec::new(),
        backend_kind: opts.backend_kind,
        remote_session_id: opencode_session_id.clone(),
        is_active: false,
        unknown_fields: Default::default(),
    };

    let mut member_added = false;
    let result = (|| -> BackendResult<String> {
        team::add_member(team_name, Member::Teammate(member.clone()), base_dir).map_err(core_err)?;
        member_added = true;

        inbox::ensure_inbox(team_name, name, base_dir).map_err(core_err)?;
        inbox::send_plain_message(team_name, "team-lead", name, prompt, None, None, base_dir).map_err(core_err)?;

        let cmd = if opts.backend_kind == BackendKind::Opencode {
            let server_url = opts.opencode_server_url.as_deref().expect("checked above");
            let session_id = opencode_session_id.as_deref().expect("created above");
            let wrapped = render_opencode_prompt(name, team_name, prompt);
            remote::send_prompt_async(server_url, session_id, &wrapped, Some(opts.opencode_agent.as_deref().unwrap_or("build")))?;
            build_opencode_attach_command(
                opts.opencode_binary.as_deref().expect("checked above"),
                server_url,
                session_id,
                &resolved_cwd,
            )
        } else {
            build_spawn_command(&member, claude_binary.expect("checked above"), lead_session_id)
        };

        let args = build_tmux_spawn_args(&cmd, name);
        let output = Command::new(&args[0]).args(&args[1..]).output()?;
        if !output.status.success() {
            return Err(BackendError::Io(std::io::Error::other(format!(
                "tmux exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ))));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    })();

    match result {
        Ok(pane_id) => {
            let mut config = team::read_config(team_name, base_dir).map_err(core_err)?;
            for m in config.members.iter_mut() {
                if let Member::Teammate(t) = m {
                    if t.name == name {
                        t.multiplexer_target_id = pane_id.clone();
                    }
                }
            }
            team::write_config(team_name, &config, base_dir).map_err(core_err)?;
            member.multiplexer_target_id = pane_id;
            Ok(member)
        }
        Err(e) => {
            if member_added {
                let _ = team::remove_member(team_name, name, base_dir);
            }
            if opts.backend_kind == BackendKind::Opencode {
                if let (Some(url), Some(session_id)) = (&opts.opencode_server_url, &opencode_session_id) {
                    let _ = remote::abort_session(url, session_id);
                    let _ = remote::delete_session(url, session_id);
                }
            }
            Err(e)
        }
    }
}

/// Kill a teammate's multiplexer target. Window ids (`@N`) are killed with
/// `kill-window`, pane ids (`%N`) with `kill-pane`. Never fails loudly — a
/// pane that's already gone is not an error worth surfacing.
pub fn kill_tmux_pane(target_id: &str) {
    if target_id.is_empty() {
        return;
    }
    let subcommand = if target_id.starts_with('@') { "kill-window" } else { "kill-pane" };
    let _ = Command::new("tmux").args([subcommand, "-t", target_id]).output();
}
