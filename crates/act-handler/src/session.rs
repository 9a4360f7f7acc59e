//! Per-connection session state: discovered harness binaries and the
//! one-team-per-session invariant.
//!
//! Grounded on `server.py`'s `app_lifespan`, which stashes `claude_binary`,
//! a generated `session_id`, and `active_team: None` in the MCP lifespan
//! context for the lifetime of one client connection.

use act_backend::spawner;

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub claude_binary: Option<String>,
    pub opencode_binary: Option<String>,
    pub active_team: Option<String>,
}

impl Session {
    /// Discover harness binaries on `PATH` and generate a fresh session id.
    pub fn new(session_id: String) -> Self {
        Session {
            session_id,
            claude_binary: spawner::discover_harness_binary("claude"),
            opencode_binary: spawner::discover_harness_binary("opencode"),
            active_team: None,
        }
    }

    pub fn set_active_team(&mut self, team_name: &str) -> Result<(), crate::error::ToolError> {
        if let Some(existing) = &self.active_team {
            return Err(crate::error::ToolError::new(
                crate::error::ToolErrorKind::Precondition,
                format!("session already has active team: {existing}. One team per session."),
            ));
        }
        self.active_team = Some(team_name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_second_team_in_same_session() {
        let mut session = Session::new("s".to_string());
        session.set_active_team("alpha").unwrap();
        let err = session.set_active_team("beta").unwrap_err();
        assert!(err.message.contains("alpha"));
    }
}
