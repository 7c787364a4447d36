//! Configurator HTTP session.
//!
//! One session per logical operation. The session owns its HTTP client and
//! releases it when dropped, so every exit path (including `?`) closes it.

use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use sac_common::{PrivilegedUser, RecordId, ServerRoleGrant, SteamId};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::validate::{decode, decode_value, validate, EXPECTED_STATUS};
use crate::config::PrivilegesConfig;
use crate::webhooks::{signing, WebhookRoleConfig};

/// Privileged users lookup.
pub const PRIVILEGES_PATH: &str = "/v1/api/privileged/privileges/";

/// Server role grants lookup.
pub const SERVERS_PRIVILEGES_PATH: &str = "/v1/api/privileged/servers_privileges/";

/// Query parameter list, repeated keys allowed.
pub type QueryParams = Vec<(&'static str, String)>;

/// Scoped connection context to the configurator API.
pub struct ConfiguratorSession {
    client: Client,
    base_url: String,
    authorization: Option<HeaderValue>,
}

impl ConfiguratorSession {
    /// Open a session bound to the configured base URL and token.
    pub fn open(config: &PrivilegesConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        debug!(base_url = %config.api, "Configurator session opened");

        Ok(Self {
            client,
            base_url: config.api.trim_end_matches('/').to_owned(),
            authorization: config.authorization.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET. Returns the body once it is known to be JSON.
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<String, ApiError> {
        let mut request = self.client.get(self.url(path)).query(params);
        if let Some(auth) = &self.authorization {
            request = request.header(AUTHORIZATION, auth.clone());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        validate(status, &body, EXPECTED_STATUS)?;
        Ok(body)
    }

    /// Look up a privileged user by Steam id.
    ///
    /// `params` are appended after `steam_id`, e.g. `("fields!", "servers_roles")`
    /// to leave out nested grants. Only the first record of the response is
    /// returned; further matches are dropped.
    #[tracing::instrument(skip(self, params), fields(steam_id = %steam_id))]
    pub async fn fetch_privileged(
        &self,
        steam_id: &SteamId,
        params: &[(&'static str, String)],
    ) -> Result<Option<PrivilegedUser>, ApiError> {
        let mut query: QueryParams = vec![("steam_id", steam_id.to_string())];
        query.extend(params.iter().cloned());

        let body = self.get_json(PRIVILEGES_PATH, &query).await?;
        let records: Vec<Value> = decode(&body)?;

        if records.len() > 1 {
            debug!(count = records.len(), "Configurator returned several users, using the first");
        }

        records
            .into_iter()
            .next()
            .map(|first| decode_value(first, &body))
            .transpose()
    }

    /// Server role grants of a privileged user.
    ///
    /// `params` carries the repeated `roles` filter; leave it empty for an
    /// unrestricted caller.
    #[tracing::instrument(skip(self, params), fields(user_id = %user_id))]
    pub async fn fetch_servers_roles(
        &self,
        user_id: &RecordId,
        params: &[(&'static str, String)],
    ) -> Result<Vec<ServerRoleGrant>, ApiError> {
        let mut query: QueryParams = vec![("privileged", user_id.to_string())];
        query.extend(params.iter().cloned());

        let body = self.get_json(SERVERS_PRIVILEGES_PATH, &query).await?;
        decode(&body)
    }

    /// POST an encoded role grant (see [`crate::webhooks::RoleGrantRequest::to_payload`]) to
    /// the role's webhook.
    ///
    /// The exact `payload` bytes are signed and sent. Authenticated by the HMAC
    /// signature only; no authorization header is sent. Not retried.
    #[tracing::instrument(skip(self, webhook, payload), fields(url_suffix = %webhook.url_suffix))]
    pub async fn invoke_role_webhook(
        &self,
        role: &str,
        webhook: &WebhookRoleConfig,
        payload: Vec<u8>,
    ) -> Result<(), ApiError> {
        let signature = signing::sign_payload(webhook.hmac_hash, &webhook.hmac_key, &payload);

        let result = self
            .client
            .post(self.url(&webhook.url_suffix))
            .header(CONTENT_TYPE, "application/json")
            .header(webhook.hmac_header.as_str(), signature)
            .body(payload)
            .send()
            .await;

        let outcome = match result {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => validate(status, &body, EXPECTED_STATUS).map(drop),
                    Err(e) => Err(ApiError::from(e)),
                }
            }
            Err(e) => Err(ApiError::from(e)),
        };

        match &outcome {
            Ok(()) => info!(role, "Role webhook accepted"),
            Err(e) => warn!(role, kind = e.kind(), "Role webhook failed"),
        }

        outcome
    }
}

impl Drop for ConfiguratorSession {
    fn drop(&mut self) {
        debug!(base_url = %self.base_url, "Configurator session closed");
    }
}
