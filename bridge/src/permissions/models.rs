//! Permission table models.
//!
//! The table is built once from configuration and only read afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Chat guild identifier (Discord snowflake as text).
pub type GuildId = String;

/// Chat role identifier (Discord snowflake as text).
pub type RoleId = String;

/// Key of the fallback entry in every action map.
pub const OTHERS_KEY: &str = "others";

/// Commands whose access is controlled by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Look up a privileged user and their server roles.
    Read,
    /// Grant a server role through the role webhook.
    Grant,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Grant => "GRANT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READ" => Ok(Self::Read),
            "GRANT" => Ok(Self::Grant),
            other => Err(UnknownAction(other.to_owned())),
        }
    }
}

/// What one role (or the `others` fallback) may do for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePermission {
    All,
    /// Allowed role-grant names. Empty means nothing.
    Tokens(BTreeSet<String>),
}

impl RolePermission {
    pub const fn none() -> Self {
        Self::Tokens(BTreeSet::new())
    }

    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tokens(tokens.into_iter().map(Into::into).collect())
    }
}

/// Role entry as written in the config file: either an indicator string
/// (`"ALL"` / `"NONE"` by default) or a list of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawRolePermission {
    Indicator(String),
    Tokens(Vec<String>),
}

/// Configured sentinel strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators {
    pub all: String,
    pub none: String,
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            all: "ALL".into(),
            none: "NONE".into(),
        }
    }
}

impl RawRolePermission {
    /// Resolve indicator strings. Returns the unrecognised indicator on failure.
    pub fn into_permission(self, indicators: &Indicators) -> Result<RolePermission, String> {
        match self {
            Self::Indicator(s) if s == indicators.all => Ok(RolePermission::All),
            Self::Indicator(s) if s == indicators.none => Ok(RolePermission::none()),
            Self::Indicator(s) => Err(s),
            Self::Tokens(tokens) => Ok(RolePermission::tokens(tokens)),
        }
    }
}

/// Per (guild, action) role map plus its mandatory fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPermissions {
    pub roles: HashMap<RoleId, RolePermission>,
    pub others: RolePermission,
}

impl ActionPermissions {
    pub fn new(others: RolePermission) -> Self {
        Self {
            roles: HashMap::new(),
            others,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<RoleId>, permission: RolePermission) -> Self {
        self.roles.insert(role.into(), permission);
        self
    }

    /// Every token mentioned by any role or by the fallback.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.roles
            .values()
            .chain(std::iter::once(&self.others))
            .filter_map(|p| match p {
                RolePermission::Tokens(t) => Some(t),
                RolePermission::All => None,
            })
            .flatten()
            .map(String::as_str)
    }
}

/// Role-to-permission table keyed by guild, then action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTable {
    guilds: HashMap<GuildId, HashMap<Action, ActionPermissions>>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        guild: impl Into<GuildId>,
        action: Action,
        permissions: ActionPermissions,
    ) {
        self.guilds
            .entry(guild.into())
            .or_default()
            .insert(action, permissions);
    }

    #[must_use]
    pub fn with(
        mut self,
        guild: impl Into<GuildId>,
        action: Action,
        permissions: ActionPermissions,
    ) -> Self {
        self.insert(guild, action, permissions);
        self
    }

    pub fn entry(&self, guild: &str, action: Action) -> Option<&ActionPermissions> {
        self.guilds.get(guild)?.get(&action)
    }

    /// All (guild, action, entry) triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Action, &ActionPermissions)> {
        self.guilds.iter().flat_map(|(guild, actions)| {
            actions
                .iter()
                .map(move |(action, entry)| (guild.as_str(), *action, entry))
        })
    }

    pub fn guilds(&self) -> impl Iterator<Item = &str> {
        self.guilds.keys().map(String::as_str)
    }
}
