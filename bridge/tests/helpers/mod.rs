//! Shared fixtures for configurator integration tests.
//!
//! Every test gets its own `mockito` server; [`config_for`] points the test
//! configuration at it.
#![allow(dead_code)]

use reqwest::header::HeaderValue;
use sac_bridge::config::Config;
use sac_bridge::privileges::Caller;

pub const STEAM_ID: &str = "76561198000000001";
pub const TOKEN: &str = "Token test-token";
pub const PRIVILEGES_PATH: &str = "/v1/api/privileged/privileges/";
pub const SERVERS_PRIVILEGES_PATH: &str = "/v1/api/privileged/servers_privileges/";
pub const MODERATOR_HOOK_PATH: &str = "/v1/hooks/moderator/";

/// Test configuration bound to a mock server.
pub fn config_for(server_url: &str) -> Config {
    let mut config = Config::default_for_test();
    config.privileges.api = server_url.to_owned();
    config.privileges.authorization = Some(HeaderValue::from_static(TOKEN));
    config
}

/// Caller in guild `"1"` holding `roles`.
pub fn caller(roles: &[&str]) -> Caller {
    Caller {
        user_id: "4242".into(),
        guild_id: "1".into(),
        roles: roles.iter().map(|r| (*r).to_owned()).collect(),
    }
}

pub const ONE_USER: &str = r#"[{"id": 1, "steam_id": "76561198000000001", "name": "bob"}]"#;

pub const TWO_GRANTS: &str = r#"[
    {"id": 10, "server": "Main", "role": "admin", "date_end": null},
    {"id": 11, "server": "Event", "role": "moderator", "date_end": "2030-01-01T00:00:00Z"}
]"#;
