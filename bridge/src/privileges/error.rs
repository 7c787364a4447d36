//! Privileges Error Types

use sac_common::InvalidSteamId;
use tracing::{error, info, warn};

use super::outcome::Outcome;
use crate::configurator::ApiError;
use crate::permissions::PermissionError;

#[derive(Debug, thiserror::Error)]
pub enum PrivilegesError {
    #[error(transparent)]
    InvalidSteamId(#[from] InvalidSteamId),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Unknown role {role:?}")]
    UnknownRole { role: String },

    #[error("Caller has no permission for this command")]
    NoPermission,

    #[error("Permission token {token:?} has no configurator role id")]
    RoleIdNotConfigured { token: String },

    #[error("Failed to encode role grant request: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PrivilegesError {
    /// Deployment defect rather than user error or upstream trouble.
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Permission(_) | Self::RoleIdNotConfigured { .. })
    }

    /// Log at the severity of the error class and map to the caller outcome.
    pub fn into_outcome(self) -> Outcome {
        match self {
            Self::InvalidSteamId(e) => {
                info!(input = %e.0, "Rejected steam_id input");
                Outcome::InvalidInput(e.to_string())
            }
            Self::UnknownRole { role } => {
                info!(role = %role, "Rejected unknown role");
                Outcome::InvalidInput(format!("Unknown role {role:?}"))
            }
            Self::NoPermission => {
                info!("Command without permission");
                Outcome::NoPermission
            }
            Self::Encoding(e) => {
                error!(error = %e, "Failed to encode role grant request");
                Outcome::ServiceUnavailable
            }
            Self::Api(e) => {
                match &e {
                    ApiError::Connection(_) => {
                        warn!(kind = e.kind(), error = %e, "Configurator unavailable");
                    }
                    ApiError::StatusCode { .. } | ApiError::Parsing { .. } => {
                        error!(kind = e.kind(), error = %e, "Configurator API error");
                    }
                }
                Outcome::ServiceUnavailable
            }
            e => {
                error!(error = %e, "Configuration error, check the deployment");
                Outcome::ServiceUnavailable
            }
        }
    }
}
