//! Bridge Configuration
//!
//! Loads the TOML configuration file named by `SAC_CONFIG` once at startup.
//! `CONFIGURATOR_API_URL` and `CONFIGURATOR_TOKEN` override the file values.
//! Every consistency check runs here so a bad deployment refuses to start
//! instead of failing per request.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::header::{HeaderName, HeaderValue};
use sac_common::RecordId;
use serde::Deserialize;

use crate::permissions::{
    Action, ActionPermissions, Indicators, PermissionTable, RawRolePermission, RolePermission,
    OTHERS_KEY,
};
use crate::webhooks::WebhookRoleConfig;

/// Default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration consistency errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configurator API URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Configurator token is not a valid header value")]
    InvalidToken,

    #[error("Unknown action {action:?} for guild {guild}")]
    UnknownAction { guild: String, action: String },

    #[error("Guild {guild} action {action} has no \"others\" entry")]
    MissingOthers { guild: String, action: Action },

    #[error("Guild {guild} action {action} role {role}: {value:?} is neither a token list nor an indicator")]
    UnknownIndicator {
        guild: String,
        action: Action,
        role: String,
        value: String,
    },

    #[error("Permission token {token:?} has no entry in privileges.roles_id")]
    MissingRoleId { token: String },

    #[error("Grantable role {role:?} has no webhook configuration")]
    MissingWebhook { role: String },

    #[error("Webhook {role:?} has an invalid signature header name {header:?}")]
    InvalidWebhookHeader { role: String, header: String },
}

type RawTable = HashMap<String, HashMap<String, HashMap<String, RawRolePermission>>>;

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_all_indicator() -> String {
    Indicators::default().all
}

fn default_none_indicator() -> String {
    Indicators::default().none
}

#[derive(Debug, Deserialize)]
struct RawPrivileges {
    api: String,
    token: Option<String>,
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    connect_timeout_secs: u64,
    #[serde(default)]
    roles_id: HashMap<String, RecordId>,
}

/// File layout, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_all_indicator")]
    all_indicator: String,
    #[serde(default = "default_none_indicator")]
    none_indicator: String,
    privileges: RawPrivileges,
    #[serde(default)]
    permissions: RawTable,
    #[serde(default)]
    webhooks: HashMap<String, WebhookRoleConfig>,
}

/// Configurator connection settings.
#[derive(Debug, Clone)]
pub struct PrivilegesConfig {
    /// Base URL of the configurator API (e.g., "https://configurator.example")
    pub api: String,

    /// Value of the `Authorization` header for lookups (marked sensitive)
    pub authorization: Option<HeaderValue>,

    /// Whole-request deadline in seconds (default: 10)
    pub request_timeout_secs: u64,

    /// Connect deadline in seconds (default: 5)
    pub connect_timeout_secs: u64,

    /// Permission token (role name) to configurator role id
    pub roles_id: HashMap<String, RecordId>,
}

impl PrivilegesConfig {
    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            api: "http://127.0.0.1:9".into(),
            authorization: None,
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            roles_id: HashMap::new(),
        }
    }
}

/// Full bridge configuration. Immutable after load.
#[derive(Clone)]
pub struct Config {
    pub privileges: PrivilegesConfig,
    pub permissions: PermissionTable,
    /// Role name to webhook settings
    pub webhooks: HashMap<String, WebhookRoleConfig>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("privileges", &self.privileges)
            .field("guilds", &self.permissions.guilds().count())
            .field("webhooks", &self.webhooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn authorization_header(token: Option<String>) -> Result<Option<HeaderValue>, ConfigError> {
    token
        .map(|t| {
            let mut value = HeaderValue::from_str(&t).map_err(|_| ConfigError::InvalidToken)?;
            value.set_sensitive(true);
            Ok(value)
        })
        .transpose()
}

fn build_table(raw: RawTable, indicators: &Indicators) -> Result<PermissionTable, ConfigError> {
    let mut table = PermissionTable::new();

    for (guild, actions) in raw {
        for (action_name, mut roles) in actions {
            let action: Action =
                action_name
                    .parse()
                    .map_err(|_| ConfigError::UnknownAction {
                        guild: guild.clone(),
                        action: action_name.clone(),
                    })?;

            let convert = |role: &str, raw: RawRolePermission| {
                raw.into_permission(indicators)
                    .map_err(|value| ConfigError::UnknownIndicator {
                        guild: guild.clone(),
                        action,
                        role: role.to_owned(),
                        value,
                    })
            };

            let others = roles
                .remove(OTHERS_KEY)
                .ok_or_else(|| ConfigError::MissingOthers {
                    guild: guild.clone(),
                    action,
                })?;
            let mut entry = ActionPermissions::new(convert(OTHERS_KEY, others)?);

            for (role, raw) in roles {
                let permission = convert(&role, raw)?;
                entry.roles.insert(role, permission);
            }

            table.insert(guild.clone(), action, entry);
        }
    }

    Ok(table)
}

impl Config {
    /// Load configuration from the file named by `SAC_CONFIG`.
    pub fn from_env() -> Result<Self> {
        let path = env::var("SAC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::from_path(path)
    }

    /// Load configuration from a TOML file, applying env overrides.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut raw: RawConfig = toml::from_str(&text)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Ok(api) = env::var("CONFIGURATOR_API_URL") {
            raw.privileges.api = api;
        }
        if let Ok(token) = env::var("CONFIGURATOR_TOKEN") {
            raw.privileges.token = Some(token);
        }

        Self::from_raw(raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate configuration text. No env overrides.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        reqwest::Url::parse(&raw.privileges.api).map_err(|e| ConfigError::InvalidApiUrl {
            url: raw.privileges.api.clone(),
            reason: e.to_string(),
        })?;

        let indicators = Indicators {
            all: raw.all_indicator,
            none: raw.none_indicator,
        };

        let config = Self {
            privileges: PrivilegesConfig {
                api: raw.privileges.api,
                authorization: authorization_header(raw.privileges.token)?,
                request_timeout_secs: raw.privileges.request_timeout_secs,
                connect_timeout_secs: raw.privileges.connect_timeout_secs,
                roles_id: raw.privileges.roles_id,
            },
            permissions: build_table(raw.permissions, &indicators)?,
            webhooks: raw.webhooks,
        };

        config.check()?;
        Ok(config)
    }

    /// Cross-section checks: every READ token maps to a role id, every
    /// GRANT token has a webhook, every webhook header is a valid name.
    pub fn check(&self) -> Result<(), ConfigError> {
        for (_, action, entry) in self.permissions.iter() {
            for token in entry.tokens() {
                match action {
                    Action::Read if !self.privileges.roles_id.contains_key(token) => {
                        return Err(ConfigError::MissingRoleId {
                            token: token.to_owned(),
                        });
                    }
                    Action::Grant if !self.webhooks.contains_key(token) => {
                        return Err(ConfigError::MissingWebhook {
                            role: token.to_owned(),
                        });
                    }
                    _ => {}
                }
            }
        }

        for (role, webhook) in &self.webhooks {
            if HeaderName::from_bytes(webhook.hmac_header.as_bytes()).is_err() {
                return Err(ConfigError::InvalidWebhookHeader {
                    role: role.clone(),
                    header: webhook.hmac_header.clone(),
                });
            }
        }

        Ok(())
    }

    /// Create a default configuration for testing.
    ///
    /// Guild `"1"`: role `"10"` reads and grants everything, role `"11"` may
    /// read and grant `moderator` only, everyone else gets nothing.
    #[must_use]
    pub fn default_for_test() -> Self {
        let mut roles_id = HashMap::new();
        roles_id.insert("admin".to_owned(), RecordId::Int(1));
        roles_id.insert("moderator".to_owned(), RecordId::Int(2));

        let entry = || {
            ActionPermissions::new(RolePermission::none())
                .with_role("10", RolePermission::All)
                .with_role("11", RolePermission::tokens(["moderator"]))
        };

        let mut webhooks = HashMap::new();
        webhooks.insert(
            "moderator".to_owned(),
            WebhookRoleConfig {
                url_suffix: "/v1/hooks/moderator/".into(),
                hmac_key: "test-key".into(),
                hmac_header: "X-Signature".into(),
                hmac_hash: crate::webhooks::HashAlgorithm::Sha256,
            },
        );

        Self {
            privileges: PrivilegesConfig {
                roles_id,
                ..PrivilegesConfig::default_for_test()
            },
            permissions: PermissionTable::new()
                .with("1", Action::Read, entry())
                .with("1", Action::Grant, entry()),
            webhooks,
        }
    }
}
