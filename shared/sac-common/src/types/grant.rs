//! Server Role Grant Types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

/// Grant of a role on a game server, from
/// `/v1/api/privileged/servers_privileges/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRoleGrant {
    #[serde(default)]
    pub id: Option<RecordId>,
    /// Server the role applies to (name or nested object).
    #[serde(default)]
    pub server: Option<Value>,
    /// Granted role (name or nested object).
    #[serde(default)]
    pub role: Option<Value>,
    /// ISO-8601 expiry, `None` for a permanent grant.
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerRoleGrant {
    /// Human-readable label of a nested field: the string itself, or the
    /// `name`/`title` member of an object.
    pub fn label(value: Option<&Value>) -> Option<&str> {
        match value? {
            Value::String(s) => Some(s),
            Value::Object(obj) => obj
                .get("name")
                .or_else(|| obj.get("title"))
                .and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn server_label(&self) -> Option<&str> {
        Self::label(self.server.as_ref())
    }

    pub fn role_label(&self) -> Option<&str> {
        Self::label(self.role.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_from_string_or_object() {
        let grant: ServerRoleGrant = serde_json::from_str(
            r#"{"id": 3, "server": {"id": 1, "name": "Main"}, "role": "admin", "date_end": null}"#,
        )
        .unwrap();
        assert_eq!(grant.server_label(), Some("Main"));
        assert_eq!(grant.role_label(), Some("admin"));
        assert!(grant.date_end.is_none());
    }

    #[test]
    fn empty_object_is_a_grant() {
        let grant: ServerRoleGrant = serde_json::from_str("{}").unwrap();
        assert!(grant.id.is_none());
        assert_eq!(grant.server_label(), None);
    }
}
