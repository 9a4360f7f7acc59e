//! HTTP client for the remote opencode server's session API.
//!
//! Grounded on `opencode_client.py`: a handful of JSON-over-HTTP calls
//! against a single base URL, with status-code-driven error messages and a
//! 200-char response body snippet on failure.

use crate::error::{BackendError, BackendResult};
use act_core::text::truncate_chars_slice;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const BODY_SNIPPET_CHARS: usize = 200;
const INTERNAL_AGENT_NAMES: [&str; 3] = ["title", "summary", "compaction"];

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("reqwest client builds with default TLS backend")
}

fn endpoint_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

fn map_transport_err(err: reqwest::Error, url: &str) -> BackendError {
    if err.is_timeout() {
        return BackendError::External {
            message: format!("opencode server at {url} timed out after {DEFAULT_TIMEOUT_SECS}s"),
            status: None,
            body: String::new(),
        };
    }
    BackendError::External {
        message: format!("cannot reach opencode server at {url}: {err}"),
        status: None,
        body: String::new(),
    }
}

fn request(method: reqwest::Method, url: &str, body: Option<Value>) -> BackendResult<Vec<u8>> {
    let req = client().request(method, url);
    let req = match &body {
        Some(b) => req.json(b),
        None => req,
    };
    let resp = req.send().map_err(|e| map_transport_err(e, url))?;

    let status = resp.status();
    if status.is_success() {
        return resp.bytes().map(|b| b.to_vec()).map_err(|e| map_transport_err(e, url));
    }

    let code = status.as_u16();
    let raw_body = resp.text().unwrap_or_default();
    let snippet = truncate_chars_slice(&raw_body, BODY_SNIPPET_CHARS).to_string();
    let endpoint = endpoint_name(url);

    let message = if code == 400 {
        format!("opencode rejected request to {endpoint}: {}", if snippet.is_empty() { code.to_string() } else { snippet.clone() })
    } else if code == 404 {
        format!("opencode resource not found at {endpoint}")
    } else if code >= 500 {
        format!("opencode server error ({code}) on {endpoint}: {snippet}")
    } else {
        format!("unexpected response from opencode ({code}) on {endpoint}: {snippet}")
    };

    Err(BackendError::External { message, status: Some(code), body: snippet })
}

const MCP_NOT_CONFIGURED_TEMPLATE: &str = "Cannot spawn opencode teammate: the 'claude-teams' MCP server is not configured \
(or not connected) in the opencode instance at {server_url}.

Add the following to your opencode MCP config (~/.config/opencode/opencode.json):

{{
  \"mcp\": {{
    \"claude-teams\": {{
      \"type\": \"local\",
      \"command\": [\"uvx\", \"--from\", \"git+https://github.com/cs50victor/claude-code-teams-mcp\", \"claude-teams\"],
      \"enabled\": true
    }}
  }}
}}

Then restart the opencode server and try again.";

pub fn verify_mcp_configured(server_url: &str) -> BackendResult<()> {
    let raw = request(reqwest::Method::GET, &format!("{server_url}/mcp"), None)?;
    let data: Value = serde_json::from_slice(&raw).map_err(|_| BackendError::External {
        message: "opencode returned invalid JSON from /mcp".to_string(),
        status: None,
        body: String::new(),
    })?;
    let connected = data
        .get("claude-teams")
        .and_then(|ct| ct.get("status"))
        .and_then(|s| s.as_str())
        == Some("connected");
    if !connected {
        return Err(BackendError::External {
            message: MCP_NOT_CONFIGURED_TEMPLATE.replace("{server_url}", server_url),
            status: None,
            body: String::new(),
        });
    }
    Ok(())
}

pub fn create_session(server_url: &str, title: &str, permissions: Option<Value>) -> BackendResult<String> {
    let mut body = json!({ "title": title });
    if let Some(p) = permissions {
        body["permission"] = p;
    }
    let raw = request(reqwest::Method::POST, &format!("{server_url}/session"), Some(body))?;
    let data: Value = serde_json::from_slice(&raw).map_err(|_| BackendError::External {
        message: "opencode returned invalid JSON from /session".to_string(),
        status: None,
        body: String::new(),
    })?;
    data.get("id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| BackendError::External {
            message: "opencode session creation returned no session ID".to_string(),
            status: None,
            body: String::new(),
        })
}

pub fn send_prompt_async(server_url: &str, session_id: &str, text: &str, agent: Option<&str>) -> BackendResult<()> {
    let mut body = json!({ "parts": [{ "type": "text", "text": text }] });
    if let Some(a) = agent {
        body["agent"] = json!(a);
    }
    request(reqwest::Method::POST, &format!("{server_url}/session/{session_id}/prompt_async"), Some(body))?;
    Ok(())
}

pub fn abort_session(server_url: &str, session_id: &str) -> BackendResult<()> {
    request(reqwest::Method::POST, &format!("{server_url}/session/{session_id}/abort"), None)?;
    Ok(())
}

pub fn delete_session(server_url: &str, session_id: &str) -> BackendResult<()> {
    request(reqwest::Method::DELETE, &format!("{server_url}/session/{session_id}"), None)?;
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpencodeAgent {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// List externally-usable opencode agents: drops the three internal agent
/// names *and* any entry with an empty or missing description.
pub fn list_agents(server_url: &str) -> Vec<OpencodeAgent> {
    let raw = match request(reqwest::Method::GET, &format!("{server_url}/agent"), None) {
        Ok(r) => r,
        Err(_) => return Vec::new(),
    };
    let data: Value = match serde_json::from_slice(&raw) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    let Some(entries) = data.as_array() else { return Vec::new() };

    entries
        .iter()
        .filter_map(|a| {
            let obj = a.as_object()?;
            let name = obj.get("name")?.as_str()?;
            let description = obj.get("description").and_then(|d| d.as_str()).unwrap_or("");
            if description.is_empty() || INTERNAL_AGENT_NAMES.contains(&name) {
                return None;
            }
            Some(OpencodeAgent { name: name.to_string(), description: description.to_string() })
        })
        .collect()
}

pub fn get_session_status(server_url: &str, session_id: &str) -> BackendResult<String> {
    let raw = request(reqwest::Method::GET, &format!("{server_url}/session/status"), None)?;
    let data: Value = serde_json::from_slice(&raw).map_err(|_| BackendError::External {
        message: "opencode returned invalid JSON from /session/status".to_string(),
        status: None,
        body: String::new(),
    })?;
    Ok(data.get(session_id).and_then(|v| v.as_str()).unwrap_or("unknown").to_string())
}
