//! Team member schema: the lead and its teammates.
//!
//! A team's member list is a mix of exactly one lead and zero or more
//! teammates, persisted as one JSON array with no separate tag in legacy
//! data: a member is a teammate if it carries a `prompt` field, lead
//! otherwise. New writes add an explicit `kind` discriminant
//! (`"lead"`/`"teammate"`) so readers never have to guess, while still
//! accepting the implicit (pre-existing) form.

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Which process family a teammate is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Claude,
    Opencode,
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Claude
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Claude => write!(f, "claude"),
            BackendKind::Opencode => write!(f, "opencode"),
        }
    }
}

/// The team's controller. Always present, always named `team-lead`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadMember {
    pub agent_id: String,
    pub name: String,
    pub agent_type: String,
    pub model: String,
    pub joined_at: u64,
    #[serde(default)]
    pub multiplexer_target_id: String,
    pub cwd: String,
    #[serde(default)]
    pub subscriptions: Vec<Value>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, Value>,
}

/// A spawned agent working under the lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeammateMember {
    pub agent_id: String,
    pub name: String,
    pub agent_type: String,
    pub model: String,
    pub prompt: String,
    pub color: String,
    #[serde(default)]
    pub plan_mode_required: bool,
    pub joined_at: u64,
    #[serde(default)]
    pub multiplexer_target_id: String,
    pub cwd: String,
    #[serde(default)]
    pub subscriptions: Vec<Value>,
    #[serde(default)]
    pub backend_kind: BackendKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_session_id: Option<String>,
    #[serde(default)]
    pub is_active: bool,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, Value>,
}

/// A member as it appears in [`crate::schema::TeamConfig::members`].
#[derive(Debug, Clone)]
pub enum Member {
    Lead(LeadMember),
    Teammate(TeammateMember),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Lead(l) => &l.name,
            Member::Teammate(t) => &t.name,
        }
    }

    pub fn agent_id(&self) -> &str {
        match self {
            Member::Lead(l) => &l.agent_id,
            Member::Teammate(t) => &t.agent_id,
        }
    }

    pub fn multiplexer_target_id(&self) -> &str {
        match self {
            Member::Lead(l) => &l.multiplexer_target_id,
            Member::Teammate(t) => &t.multiplexer_target_id,
        }
    }

    pub fn set_multiplexer_target_id(&mut self, id: String) {
        match self {
            Member::Lead(l) => l.multiplexer_target_id = id,
            Member::Teammate(t) => t.multiplexer_target_id = id,
        }
    }

    pub fn as_teammate(&self) -> Option<&TeammateMember> {
        match self {
            Member::Teammate(t) => Some(t),
            Member::Lead(_) => None,
        }
    }

    pub fn as_teammate_mut(&mut self) -> Option<&mut TeammateMember> {
        match self {
            Member::Teammate(t) => Some(t),
            Member::Lead(_) => None,
        }
    }

    pub fn is_teammate(&self) -> bool {
        matches!(self, Member::Teammate(_))
    }
}

impl Serialize for Member {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (mut value, kind) = match self {
            Member::Lead(l) => (serde_json::to_value(l).map_err(S::Error::custom)?, "lead"),
            Member::Teammate(t) => (serde_json::to_value(t).map_err(S::Error::custom)?, "teammate"),
        };
        if let Value::Object(map) = &mut value {
            map.insert("kind".to_string(), Value::String(kind.to_string()));
        }
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Member {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let is_teammate = match value.get("kind").and_then(Value::as_str) {
            Some("teammate") => true,
            Some("lead") => false,
            _ => value.get("prompt").is_some(),
        };
        if is_teammate {
            serde_json::from_value(value).map(Member::Teammate).map_err(D::Error::custom)
        } else {
            serde_json::from_value(value).map(Member::Lead).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lead() -> LeadMember {
        LeadMember {
            agent_id: "team-lead@demo".into(),
            name: "team-lead".into(),
            agent_type: "team-lead".into(),
            model: "claude-opus-4-6".into(),
            joined_at: 1_770_765_919_076,
            multiplexer_target_id: String::new(),
            cwd: "/tmp/demo".into(),
            subscriptions: vec![],
            unknown_fields: HashMap::new(),
        }
    }

    fn sample_teammate() -> TeammateMember {
        TeammateMember {
            agent_id: "poet@demo".into(),
            name: "poet".into(),
            agent_type: "general-purpose".into(),
            model: "sonnet".into(),
            prompt: "write haiku".into(),
            color: "blue".into(),
            plan_mode_required: false,
            joined_at: 1_770_772_206_905,
            multiplexer_target_id: "%14".into(),
            cwd: "/tmp/demo".into(),
            subscriptions: vec![],
            backend_kind: BackendKind::Claude,
            remote_session_id: None,
            is_active: false,
            unknown_fields: HashMap::new(),
        }
    }

    #[test]
    fn discriminates_implicit_lead_and_teammate() {
        let lead_json = serde_json::json!({
            "agentId": "team-lead@demo", "name": "team-lead", "agentType": "team-lead",
            "model": "claude-opus-4-6", "joinedAt": 1, "cwd": "/tmp",
        });
        let teammate_json = serde_json::json!({
            "agentId": "poet@demo", "name": "poet", "agentType": "general-purpose",
            "model": "sonnet", "prompt": "hi", "color": "blue", "joinedAt": 2, "cwd": "/tmp",
        });

        let lead: Member = serde_json::from_value(lead_json).unwrap();
        let teammate: Member = serde_json::from_value(teammate_json).unwrap();
        assert!(matches!(lead, Member::Lead(_)));
        assert!(matches!(teammate, Member::Teammate(_)));
    }

    #[test]
    fn round_trips_through_explicit_kind() {
        let member = Member::Teammate(sample_teammate());
        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value.get("kind").and_then(Value::as_str), Some("teammate"));

        let reparsed: Member = serde_json::from_value(value).unwrap();
        assert_eq!(reparsed.name(), "poet");
        assert!(reparsed.is_teammate());
    }

    #[test]
    fn lead_round_trips_with_kind() {
        let member = Member::Lead(sample_lead());
        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value.get("kind").and_then(Value::as_str), Some("lead"));
        let reparsed: Member = serde_json::from_value(value).unwrap();
        assert!(!reparsed.is_teammate());
    }

    #[test]
    fn preserves_unknown_fields() {
        let json = serde_json::json!({
            "agentId": "poet@demo", "name": "poet", "agentType": "general-purpose",
            "model": "sonnet", "prompt": "hi", "color": "blue", "joinedAt": 2, "cwd": "/tmp",
            "futureField": "value",
        });
        let member: Member = serde_json::from_value(json).unwrap();
        let teammate = member.as_teammate().unwrap();
        assert_eq!(
            teammate.unknown_fields.get("futureField"),
            Some(&Value::String("value".into()))
        );
    }
}
