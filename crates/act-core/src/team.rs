//! Team registry: create/delete teams, read/write config, add/remove members.
//!
//! A config file per team under `teams/{name}/`, with a sibling
//! `tasks/{name}/` directory created at the same time. Every write routes
//! through [`crate::io::write_atomic`].

use crate::error::{CoreError, CoreResult};
use crate::io::{acquire_lock, read_json, write_json_pretty};
use crate::paths;
use crate::schema::{LeadMember, Member, TeamConfig};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const LOCK_RETRIES: u32 = 5;

fn valid_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

/// Validates an agent/team name: `^[A-Za-z0-9_-]+$`, length <= 64.
pub fn validate_name(kind: &str, name: &str) -> CoreResult<()> {
    if !valid_name_re().is_match(name) {
        return Err(CoreError::InvalidInput(format!(
            "invalid {kind} name {name:?}: use only letters, numbers, hyphens, underscores"
        )));
    }
    if name.len() > 64 {
        return Err(CoreError::InvalidInput(format!(
            "{kind} name too long ({} chars, max 64)",
            name.len()
        )));
    }
    Ok(())
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// Result of [`create_team`], carrying the paths a caller would want to print.
#[derive(Debug, Clone)]
pub struct TeamCreateResult {
    pub team_name: String,
    pub team_file_path: String,
    pub lead_agent_id: String,
}

/// Result of [`delete_team`].
#[derive(Debug, Clone)]
pub struct TeamDeleteResult {
    pub success: bool,
    pub message: String,
    pub team_name: String,
}

pub fn team_exists(team_name: &str, base_dir: Option<&Path>) -> bool {
    match paths::team_config_path(team_name, base_dir) {
        Ok(path) => path.exists(),
        Err(_) => false,
    }
}

pub fn create_team(
    name: &str,
    session_id: &str,
    description: &str,
    lead_model: &str,
    cwd: &Path,
    base_dir: Option<&Path>,
) -> CoreResult<TeamCreateResult> {
    validate_name("team", name)?;

    let team_dir = paths::team_dir(name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    std::fs::create_dir_all(&team_dir)
        .map_err(|e| CoreError::Io(crate::io::StoreError::Io { path: team_dir.clone(), source: e }))?;

    let task_dir = paths::task_team_dir(name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    std::fs::create_dir_all(&task_dir)
        .map_err(|e| CoreError::Io(crate::io::StoreError::Io { path: task_dir.clone(), source: e }))?;
    let task_lock = task_dir.join(".lock");
    std::fs::File::create(&task_lock)
        .map_err(|e| CoreError::Io(crate::io::StoreError::Io { path: task_lock.clone(), source: e }))?;

    let created_at = now_ms();
    let lead_agent_id = format!("team-lead@{name}");

    let lead = LeadMember {
        agent_id: lead_agent_id.clone(),
        name: "team-lead".to_string(),
        agent_type: "team-lead".to_string(),
        model: lead_model.to_string(),
        joined_at: created_at,
        multiplexer_target_id: String::new(),
        cwd: cwd.display().to_string(),
        subscriptions: Vec::new(),
        unknown_fields: Default::default(),
    };

    let config = TeamConfig {
        name: name.to_string(),
        description: if description.is_empty() { None } else { Some(description.to_string()) },
        created_at,
        lead_agent_id: lead_agent_id.clone(),
        lead_session_id: session_id.to_string(),
        members: vec![Member::Lead(lead)],
        unknown_fields: Default::default(),
    };

    let config_path = paths::team_config_path(name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    write_json_pretty(&config_path, &config)?;

    Ok(TeamCreateResult {
        team_name: name.to_string(),
        team_file_path: config_path.display().to_string(),
        lead_agent_id,
    })
}

pub fn read_config(team_name: &str, base_dir: Option<&Path>) -> CoreResult<TeamConfig> {
    let path = paths::team_config_path(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    if !path.exists() {
        return Err(CoreError::NotFound(format!("team {team_name:?} not found")));
    }
    Ok(read_json(&path)?)
}

fn write_config_unlocked(team_name: &str, config: &TeamConfig, base_dir: Option<&Path>) -> CoreResult<()> {
    let path = paths::team_config_path(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    write_json_pretty(&path, config)?;
    Ok(())
}

/// Writes the full team config under the team's directory lock.
///
/// Callers that already hold the lock as part of a larger read-modify-write
/// transaction (`add_member`, `remove_member`) must go through
/// [`write_config_unlocked`] instead — `fs2` locks aren't reentrant within a
/// process, so taking the lock twice here would deadlock.
pub fn write_config(team_name: &str, config: &TeamConfig, base_dir: Option<&Path>) -> CoreResult<()> {
    let lock_path = paths::team_lock_path(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;
    write_config_unlocked(team_name, config, base_dir)
}

pub fn delete_team(team_name: &str, base_dir: Option<&Path>) -> CoreResult<TeamDeleteResult> {
    let config = read_config(team_name, base_dir)?;
    let non_lead: Vec<_> = config.members.iter().filter(|m| m.is_teammate()).collect();
    if !non_lead.is_empty() {
        return Err(CoreError::Precondition(format!(
            "cannot delete team {team_name:?}: {} non-lead member(s) still present, remove all teammates before deleting",
            non_lead.len()
        )));
    }

    let team_dir = paths::team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let task_dir = paths::task_team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    std::fs::remove_dir_all(&team_dir)
        .map_err(|e| CoreError::Io(crate::io::StoreError::Io { path: team_dir, source: e }))?;
    std::fs::remove_dir_all(&task_dir)
        .map_err(|e| CoreError::Io(crate::io::StoreError::Io { path: task_dir, source: e }))?;

    Ok(TeamDeleteResult {
        success: true,
        message: format!("Cleaned up directories for team \"{team_name}\""),
        team_name: team_name.to_string(),
    })
}

pub fn add_member(team_name: &str, member: Member, base_dir: Option<&Path>) -> CoreResult<()> {
    let lock_path = paths::team_lock_path(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

    let mut config = read_config(team_name, base_dir)?;
    if config.members.iter().any(|m| m.name() == member.name()) {
        return Err(CoreError::Conflict(format!(
            "member {:?} already exists in team {team_name:?}",
            member.name()
        )));
    }
    config.members.push(member);
    write_config_unlocked(team_name, &config, base_dir)
}

pub fn remove_member(team_name: &str, agent_name: &str, base_dir: Option<&Path>) -> CoreResult<()> {
    if agent_name == "team-lead" {
        return Err(CoreError::InvalidInput("cannot remove team-lead from team".to_string()));
    }
    let lock_path = paths::team_lock_path(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

    let mut config = read_config(team_name, base_dir)?;
    config.members.retain(|m| m.name() != agent_name);
    write_config_unlocked(team_name, &config, base_dir)
}
