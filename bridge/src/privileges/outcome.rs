//! Caller-visible result of one command.

use sac_common::{PrivilegedUser, ServerRoleGrant, SteamId};

/// Exactly one of these is produced per command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Lookup succeeded.
    Found {
        user: PrivilegedUser,
        grants: Vec<ServerRoleGrant>,
    },
    /// Role webhook accepted the grant.
    Granted { steam_id: SteamId, role: String },
    /// No such user, or no grants visible to the caller.
    NotFound,
    /// Caller's roles do not allow the command.
    NoPermission,
    /// Upstream or deployment problem.
    ServiceUnavailable,
    /// User input was rejected.
    InvalidInput(String),
}

impl Outcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Found { .. } | Self::Granted { .. })
    }
}
