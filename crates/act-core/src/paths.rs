//! Filesystem layout under the resolved home directory.
//!
//! ```text
//! {home}/.claude/teams/{team}/config.json
//! {home}/.claude/teams/{team}/.lock
//! {home}/.claude/teams/{team}/inboxes/{agent}.json
//! {home}/.claude/teams/{team}/inboxes/.lock
//! {home}/.claude/tasks/{team}/{task_id}.json
//! {home}/.claude/tasks/{team}/.lock
//! ```
//!
//! One indirection point (`teams_root`/`tasks_root`) so tests can redirect
//! everything into a [`tempfile::TempDir`] without touching `ACT_HOME`.

use crate::home::get_home_dir;
use anyhow::Result;
use std::path::{Path, PathBuf};

fn claude_dir(base_dir: Option<&Path>) -> Result<PathBuf> {
    match base_dir {
        Some(base) => Ok(base.to_path_buf()),
        None => Ok(get_home_dir()?.join(".claude")),
    }
}

pub fn teams_root(base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(claude_dir(base_dir)?.join("teams"))
}

pub fn tasks_root(base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(claude_dir(base_dir)?.join("tasks"))
}

pub fn team_dir(team_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(teams_root(base_dir)?.join(team_name))
}

pub fn team_config_path(team_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(team_dir(team_name, base_dir)?.join("config.json"))
}

pub fn team_lock_path(team_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(team_dir(team_name, base_dir)?.join(".lock"))
}

pub fn inboxes_dir(team_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(team_dir(team_name, base_dir)?.join("inboxes"))
}

pub fn inbox_path(team_name: &str, agent_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(inboxes_dir(team_name, base_dir)?.join(format!("{agent_name}.json")))
}

pub fn inbox_lock_path(team_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(inboxes_dir(team_name, base_dir)?.join(".lock"))
}

pub fn task_team_dir(team_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(tasks_root(base_dir)?.join(team_name))
}

pub fn task_path(team_name: &str, task_id: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(task_team_dir(team_name, base_dir)?.join(format!("{task_id}.json")))
}

pub fn task_lock_path(team_name: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    Ok(task_team_dir(team_name, base_dir)?.join(".lock"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn derives_all_paths_from_base_dir() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        assert_eq!(team_config_path("demo", Some(base)).unwrap(), base.join("teams/demo/config.json"));
        assert_eq!(team_lock_path("demo", Some(base)).unwrap(), base.join("teams/demo/.lock"));
        assert_eq!(inbox_path("demo", "poet", Some(base)).unwrap(), base.join("teams/demo/inboxes/poet.json"));
        assert_eq!(inbox_lock_path("demo", Some(base)).unwrap(), base.join("teams/demo/inboxes/.lock"));
        assert_eq!(task_path("demo", "1", Some(base)).unwrap(), base.join("tasks/demo/1.json"));
        assert_eq!(task_lock_path("demo", Some(base)).unwrap(), base.join("tasks/demo/.lock"));
    }
}
