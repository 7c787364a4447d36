//! Privileged User Types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SteamId;

/// Upstream record id. The configurator emits integers, but string ids are
/// accepted so the bridge never depends on that detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

/// Privileged user as returned by `/v1/api/privileged/privileges/`.
///
/// Fetched per request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivilegedUser {
    /// Configurator user ID.
    pub id: RecordId,
    /// Steam identity.
    #[serde(default)]
    pub steam_id: Option<SteamId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Every other field the configurator sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_record_deserializes() {
        let user: PrivilegedUser = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(user.id, RecordId::Int(1));
        assert!(user.steam_id.is_none());
        assert!(user.extra.is_empty());
    }

    #[test]
    fn unknown_fields_are_kept() {
        let user: PrivilegedUser = serde_json::from_str(
            r#"{"id": "u-7", "steam_id": 76561198000000001, "name": "bob", "discord_id": 42}"#,
        )
        .unwrap();
        assert_eq!(user.id.to_string(), "u-7");
        assert_eq!(user.steam_id.unwrap().as_str(), "76561198000000001");
        assert_eq!(user.name.as_deref(), Some("bob"));
        assert_eq!(user.extra.get("discord_id"), Some(&Value::from(42)));
    }
}
