//! Backend configuration resolved once from the process environment.
//!
//! Reads env vars once, validates, and produces one typed struct rather
//! than scattering `env::var` calls through business logic.

/// Which harness(es) a team may spawn teammates on, from `CLAUDE_TEAMS_BACKENDS`
/// (comma-separated, e.g. `"claude,opencode"`). Defaults to `["claude"]`
/// when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub enabled_backends: Vec<String>,
    pub opencode_server_url: Option<String>,
    pub opencode_default_model: String,
    pub use_tmux_windows: bool,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        let enabled_backends = std::env::var("CLAUDE_TEAMS_BACKENDS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| p == "claude" || p == "opencode")
                    .collect::<Vec<_>>()
            })
            .filter(|v: &Vec<String>| !v.is_empty())
            .unwrap_or_else(|| vec!["claude".to_string()]);

        let opencode_server_url = std::env::var("OPENCODE_SERVER_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let opencode_default_model = std::env::var("OPENCODE_DEFAULT_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "sonnet".to_string());

        let use_tmux_windows = std::env::var("USE_TMUX_WINDOWS").is_ok();

        BackendConfig { enabled_backends, opencode_server_url, opencode_default_model, use_tmux_windows }
    }

    pub fn supports(&self, backend: &str) -> bool {
        self.enabled_backends.iter().any(|b| b == backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear() {
        unsafe {
            env::remove_var("CLAUDE_TEAMS_BACKENDS");
            env::remove_var("OPENCODE_SERVER_URL");
            env::remove_var("OPENCODE_DEFAULT_MODEL");
            env::remove_var("USE_TMUX_WINDOWS");
        }
    }

    #[test]
    #[serial]
    fn defaults_to_claude_only() {
        clear();
        let cfg = BackendConfig::from_env();
        assert_eq!(cfg.enabled_backends, vec!["claude".to_string()]);
        assert!(cfg.opencode_server_url.is_none());
        assert_eq!(cfg.opencode_default_model, "sonnet");
        assert!(!cfg.use_tmux_windows);
        clear();
    }

    #[test]
    #[serial]
    fn parses_comma_separated_backends() {
        clear();
        unsafe {
            env::set_var("CLAUDE_TEAMS_BACKENDS", "claude, opencode");
            env::set_var("USE_TMUX_WINDOWS", "1");
        }
        let cfg = BackendConfig::from_env();
        assert!(cfg.supports("claude"));
        assert!(cfg.supports("opencode"));
        assert!(cfg.use_tmux_windows);
        clear();
    }

    #[test]
    #[serial]
    fn drops_unrecognized_backend_entries() {
        clear();
        unsafe {
            env::set_var("CLAUDE_TEAMS_BACKENDS", "claude,telepathy,opencode");
        }
        let cfg = BackendConfig::from_env();
        assert_eq!(cfg.enabled_backends, vec!["claude".to_string(), "opencode".to_string()]);
        clear();
    }

    #[test]
    #[serial]
    fn falls_back_to_claude_when_every_entry_is_unrecognized() {
        clear();
        unsafe {
            env::set_var("CLAUDE_TEAMS_BACKENDS", "telepathy,smoke-signal");
        }
        let cfg = BackendConfig::from_env();
        assert_eq!(cfg.enabled_backends, vec!["claude".to_string()]);
        clear();
    }
}
