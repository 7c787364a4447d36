//! Webhook Types

use std::fmt;

use sac_common::SteamId;
use serde::{Deserialize, Serialize};

/// Digest used for the HMAC signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

fn default_hmac_header() -> String {
    "X-Signature".to_owned()
}

/// Static per-role webhook settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookRoleConfig {
    /// Path appended to the configurator base URL.
    pub url_suffix: String,
    /// Shared HMAC secret.
    pub hmac_key: String,
    /// Header carrying the hex signature.
    #[serde(default = "default_hmac_header")]
    pub hmac_header: String,
    #[serde(default)]
    pub hmac_hash: HashAlgorithm,
}

impl fmt::Debug for WebhookRoleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookRoleConfig")
            .field("url_suffix", &self.url_suffix)
            .field("hmac_key", &"<redacted>")
            .field("hmac_header", &self.hmac_header)
            .field("hmac_hash", &"<redacted>")
            .finish()
    }
}

/// Body POSTed to a role webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGrantRequest {
    pub steam_id: SteamId,
    /// Name of the player receiving the role.
    pub name: String,
    pub comment: String,
    /// Grant length in seconds, `None` for unlimited.
    pub duration: Option<u64>,
}

impl RoleGrantRequest {
    /// JSON bytes to sign and send.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
