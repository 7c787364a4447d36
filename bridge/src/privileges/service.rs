//! Privileges commands.
//!
//! Resolve the caller's permission first; only callers with some permission
//! reach the configurator.

use std::sync::Arc;

use sac_common::SteamId;
use tracing::info;

use super::error::PrivilegesError;
use super::outcome::Outcome;
use crate::config::Config;
use crate::configurator::{ConfiguratorSession, QueryParams};
use crate::permissions::{resolve, Action, PermissionDecision, RoleId};
use crate::webhooks::RoleGrantRequest;

/// Field exclusion sent with the user lookup; grants are fetched separately.
pub const EXCLUDE_SERVERS_ROLES: (&str, &str) = ("fields!", "servers_roles");

/// Who issued the command and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Chat user id, for logs only.
    pub user_id: String,
    pub guild_id: String,
    pub roles: Vec<RoleId>,
}

/// Arguments of the grant command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantCommand {
    /// Role name; must be a key of the webhook configuration.
    pub role: String,
    /// Player name sent to the configurator.
    pub name: String,
    pub comment: String,
    /// Seconds, `None` for unlimited.
    pub duration: Option<u64>,
}

#[derive(Clone)]
pub struct PrivilegesService {
    config: Arc<Config>,
}

impl PrivilegesService {
    pub const fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `roles` filter for the grants lookup. Empty for an unrestricted caller.
    ///
    /// A `None` decision has no filter at all and is rejected.
    pub fn role_params(&self, decision: &PermissionDecision) -> Result<QueryParams, PrivilegesError> {
        match decision {
            PermissionDecision::None => Err(PrivilegesError::NoPermission),
            PermissionDecision::All => Ok(Vec::new()),
            PermissionDecision::Subset(tokens) => tokens
                .iter()
                .map(|token| {
                    self.config
                        .privileges
                        .roles_id
                        .get(token)
                        .map(|id| ("roles", id.to_string()))
                        .ok_or_else(|| PrivilegesError::RoleIdNotConfigured {
                            token: token.clone(),
                        })
                })
                .collect(),
        }
    }

    /// Look up a privileged user and the server roles the caller may see.
    pub async fn get(&self, caller: &Caller, raw_steam_id: &str) -> Outcome {
        self.try_get(caller, raw_steam_id)
            .await
            .unwrap_or_else(PrivilegesError::into_outcome)
    }

    #[tracing::instrument(skip(self, caller), fields(user = %caller.user_id, guild = %caller.guild_id))]
    async fn try_get(&self, caller: &Caller, raw_steam_id: &str) -> Result<Outcome, PrivilegesError> {
        let steam_id = SteamId::parse(raw_steam_id)?;

        let decision = resolve(
            &caller.roles,
            Action::Read,
            &self.config.permissions,
            &caller.guild_id,
        )?;
        if decision.is_none() {
            info!(steam_id = %steam_id, "Lookup without permission");
            return Ok(Outcome::NoPermission);
        }

        let roles = self.role_params(&decision)?;
        let (field, value) = EXCLUDE_SERVERS_ROLES;

        let session = ConfiguratorSession::open(&self.config.privileges)?;

        let Some(user) = session
            .fetch_privileged(&steam_id, &[(field, value.to_owned())])
            .await?
        else {
            return Ok(Outcome::NotFound);
        };

        let grants = session.fetch_servers_roles(&user.id, &roles).await?;
        if grants.is_empty() {
            return Ok(Outcome::NotFound);
        }

        Ok(Outcome::Found { user, grants })
    }

    /// Grant a server role through the role's signed webhook.
    pub async fn grant(&self, caller: &Caller, raw_steam_id: &str, command: GrantCommand) -> Outcome {
        self.try_grant(caller, raw_steam_id, command)
            .await
            .unwrap_or_else(PrivilegesError::into_outcome)
    }

    #[tracing::instrument(
        skip(self, caller, command),
        fields(user = %caller.user_id, guild = %caller.guild_id, role = %command.role)
    )]
    async fn try_grant(
        &self,
        caller: &Caller,
        raw_steam_id: &str,
        command: GrantCommand,
    ) -> Result<Outcome, PrivilegesError> {
        let steam_id = SteamId::parse(raw_steam_id)?;

        let decision = resolve(
            &caller.roles,
            Action::Grant,
            &self.config.permissions,
            &caller.guild_id,
        )?;
        if !decision.allows(&command.role) {
            info!(steam_id = %steam_id, "Grant without permission");
            return Ok(Outcome::NoPermission);
        }

        let webhook = self.config.webhooks.get(&command.role).ok_or_else(|| {
            PrivilegesError::UnknownRole {
                role: command.role.clone(),
            }
        })?;

        let payload = RoleGrantRequest {
            steam_id: steam_id.clone(),
            name: command.name,
            comment: command.comment,
            duration: command.duration,
        }
        .to_payload()
        .map_err(PrivilegesError::Encoding)?;

        let session = ConfiguratorSession::open(&self.config.privileges)?;
        session
            .invoke_role_webhook(&command.role, webhook, payload)
            .await?;

        Ok(Outcome::Granted {
            steam_id,
            role: command.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn service() -> PrivilegesService {
        PrivilegesService::new(Arc::new(Config::default_for_test()))
    }

    fn caller(roles: &[&str]) -> Caller {
        Caller {
            user_id: "99".into(),
            guild_id: "1".into(),
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
        }
    }

    #[test]
    fn role_params_follow_decision() {
        let svc = service();
        assert!(svc.role_params(&PermissionDecision::All).unwrap().is_empty());

        let subset = PermissionDecision::Subset(BTreeSet::from(["admin".to_owned(), "moderator".to_owned()]));
        assert_eq!(
            svc.role_params(&subset).unwrap(),
            vec![("roles", "1".to_owned()), ("roles", "2".to_owned())]
        );
    }

    #[test]
    fn role_params_refuse_none() {
        assert!(matches!(
            service().role_params(&PermissionDecision::None),
            Err(PrivilegesError::NoPermission)
        ));
    }

    #[test]
    fn role_params_unknown_token() {
        let subset = PermissionDecision::Subset(BTreeSet::from(["ghost".to_owned()]));
        assert!(matches!(
            service().role_params(&subset),
            Err(PrivilegesError::RoleIdNotConfigured { token }) if token == "ghost"
        ));
    }

    #[tokio::test]
    async fn invalid_steam_id_is_reported_before_anything_else() {
        let outcome = service().get(&caller(&["10"]), "not-a-number").await;
        assert!(matches!(outcome, Outcome::InvalidInput(_)));
    }

    #[tokio::test]
    async fn no_permission_skips_upstream() {
        // The test config points at a closed port; reaching it would be ServiceUnavailable.
        let outcome = service().get(&caller(&["12"]), "76561198000000001").await;
        assert_eq!(outcome, Outcome::NoPermission);
    }

    #[tokio::test]
    async fn unknown_guild_is_service_unavailable() {
        let mut c = caller(&["10"]);
        c.guild_id = "404".into();
        let outcome = service().get(&c, "76561198000000001").await;
        assert_eq!(outcome, Outcome::ServiceUnavailable);
    }

    #[tokio::test]
    async fn grant_outside_subset_is_no_permission() {
        let command = GrantCommand {
            role: "admin".into(),
            name: "bob".into(),
            comment: String::new(),
            duration: None,
        };
        let outcome = service()
            .grant(&caller(&["11"]), "76561198000000001", command)
            .await;
        assert_eq!(outcome, Outcome::NoPermission);
    }

    #[tokio::test]
    async fn grant_of_unknown_role_is_invalid_input() {
        let command = GrantCommand {
            role: "admin".into(),
            name: "bob".into(),
            comment: String::new(),
            duration: None,
        };
        // Role 10 may grant anything, but "admin" has no webhook.
        let outcome = service()
            .grant(&caller(&["10"]), "76561198000000001", command)
            .await;
        assert_eq!(outcome, Outcome::InvalidInput("Unknown role \"admin\"".into()));
    }
}
