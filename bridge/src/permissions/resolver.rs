//! Permission resolution logic.
//!
//! Computes what a caller may do for an action from their chat roles.

use std::collections::BTreeSet;

use super::models::{Action, PermissionTable, RolePermission};

/// Effective permission of a caller for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDecision {
    /// Caller cannot act.
    None,
    /// Caller may act without restriction.
    All,
    /// Caller may act only for these tokens. Never empty.
    Subset(BTreeSet<String>),
}

impl PermissionDecision {
    fn from_tokens(tokens: BTreeSet<String>) -> Self {
        if tokens.is_empty() {
            Self::None
        } else {
            Self::Subset(tokens)
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether the decision covers `token`.
    pub fn allows(&self, token: &str) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Subset(tokens) => tokens.contains(token),
        }
    }
}

/// Resolve the caller's permission for `action` in `guild`.
///
/// Resolution order:
/// 1. Any role mapped to all-permission wins immediately
/// 2. Otherwise token sets of every mapped role are unioned
/// 3. An empty union falls back to the `others` entry
///
/// Role order and duplicates do not affect the result.
pub fn resolve<I, S>(
    caller_roles: I,
    action: Action,
    table: &PermissionTable,
    guild: &str,
) -> Result<PermissionDecision, PermissionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let entry = table
        .entry(guild, action)
        .ok_or_else(|| PermissionError::MissingEntry {
            guild: guild.to_owned(),
            action,
        })?;

    let mut union = BTreeSet::new();
    for role in caller_roles {
        match entry.roles.get(role.as_ref()) {
            Some(RolePermission::All) => return Ok(PermissionDecision::All),
            Some(RolePermission::Tokens(tokens)) => union.extend(tokens.iter().cloned()),
            None => {}
        }
    }

    if !union.is_empty() {
        return Ok(PermissionDecision::Subset(union));
    }

    Ok(match &entry.others {
        RolePermission::All => PermissionDecision::All,
        RolePermission::Tokens(tokens) => PermissionDecision::from_tokens(tokens.clone()),
    })
}

/// Permission resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// No table entry for this guild and action. A deployment defect.
    #[error("No permission entry for guild {guild} and action {action}")]
    MissingEntry { guild: String, action: Action },
}
