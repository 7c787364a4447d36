//! End-to-end command flows against a mock configurator.

mod helpers;

use std::sync::Arc;

use helpers::*;
use mockito::{Matcher, Server};
use sac_bridge::privileges::{GrantCommand, Outcome, PrivilegesService};
use sac_bridge::render::render;
use sac_common::RecordId;

fn service_for(server: &Server) -> PrivilegesService {
    PrivilegesService::new(Arc::new(config_for(&server.url())))
}

fn moderator_grant() -> GrantCommand {
    GrantCommand {
        role: "moderator".into(),
        name: "bob".into(),
        comment: "trial".into(),
        duration: Some(3600),
    }
}

#[tokio::test]
async fn test_get_unrestricted_caller_sends_no_roles_filter() {
    let mut server = Server::new_async().await;
    let user_mock = server
        .mock("GET", PRIVILEGES_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("steam_id".into(), STEAM_ID.into()),
            Matcher::UrlEncoded("fields!".into(), "servers_roles".into()),
        ]))
        .with_status(200)
        .with_body(ONE_USER)
        .create_async()
        .await;
    let grants_mock = server
        .mock("GET", SERVERS_PRIVILEGES_PATH)
        .match_query(Matcher::Exact("privileged=1".into()))
        .with_status(200)
        .with_body(TWO_GRANTS)
        .create_async()
        .await;

    let outcome = service_for(&server).get(&caller(&["10", "11"]), STEAM_ID).await;

    let Outcome::Found { user, grants } = &outcome else {
        panic!("expected Found, got {outcome:?}");
    };
    assert_eq!(user.id, RecordId::Int(1));
    assert_eq!(grants.len(), 2);
    assert!(render(&outcome).starts_with("**bob** (`76561198000000001`)"));

    user_mock.assert_async().await;
    grants_mock.assert_async().await;
}

#[tokio::test]
async fn test_get_restricted_caller_filters_by_role_id() {
    let mut server = Server::new_async().await;
    let _user = server
        .mock("GET", PRIVILEGES_PATH)
        .with_status(200)
        .with_body(ONE_USER)
        .create_async()
        .await;
    let grants_mock = server
        .mock("GET", SERVERS_PRIVILEGES_PATH)
        .match_query(Matcher::Exact("privileged=1&roles=2".into()))
        .with_status(200)
        .with_body(r#"[{"id": 11, "server": "Event", "role": "moderator"}]"#)
        .create_async()
        .await;

    let outcome = service_for(&server).get(&caller(&["11"]), STEAM_ID).await;

    assert!(matches!(outcome, Outcome::Found { ref grants, .. } if grants.len() == 1));
    grants_mock.assert_async().await;
}

#[tokio::test]
async fn test_get_unknown_user_skips_grants_lookup() {
    let mut server = Server::new_async().await;
    let _user = server
        .mock("GET", PRIVILEGES_PATH)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let grants_mock = server
        .mock("GET", SERVERS_PRIVILEGES_PATH)
        .expect(0)
        .create_async()
        .await;

    let outcome = service_for(&server).get(&caller(&["10"]), STEAM_ID).await;

    assert_eq!(outcome, Outcome::NotFound);
    grants_mock.assert_async().await;
}

#[tokio::test]
async fn test_get_no_visible_grants_is_not_found() {
    let mut server = Server::new_async().await;
    let _user = server
        .mock("GET", PRIVILEGES_PATH)
        .with_status(200)
        .with_body(ONE_USER)
        .create_async()
        .await;
    let _grants = server
        .mock("GET", SERVERS_PRIVILEGES_PATH)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let outcome = service_for(&server).get(&caller(&["11"]), STEAM_ID).await;

    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn test_get_without_permission_never_calls_upstream() {
    let mut server = Server::new_async().await;
    let user_mock = server
        .mock("GET", PRIVILEGES_PATH)
        .expect(0)
        .create_async()
        .await;

    let outcome = service_for(&server).get(&caller(&["99"]), STEAM_ID).await;

    assert_eq!(outcome, Outcome::NoPermission);
    user_mock.assert_async().await;
}

#[tokio::test]
async fn test_get_upstream_failure_is_service_unavailable() {
    let mut server = Server::new_async().await;
    let _user = server
        .mock("GET", PRIVILEGES_PATH)
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let outcome = service_for(&server).get(&caller(&["10"]), STEAM_ID).await;

    assert_eq!(outcome, Outcome::ServiceUnavailable);
    assert_eq!(render(&outcome), "The service is currently unavailable");
}

#[tokio::test]
async fn test_get_invalid_steam_id_never_calls_upstream() {
    let mut server = Server::new_async().await;
    let user_mock = server
        .mock("GET", PRIVILEGES_PATH)
        .expect(0)
        .create_async()
        .await;

    let outcome = service_for(&server).get(&caller(&["10"]), "STEAM_0:1:123").await;

    assert!(matches!(outcome, Outcome::InvalidInput(_)));
    user_mock.assert_async().await;
}

#[tokio::test]
async fn test_grant_success() {
    let mut server = Server::new_async().await;
    let hook = server
        .mock("POST", MODERATOR_HOOK_PATH)
        .match_header("x-signature", Matcher::Regex("^[0-9a-f]{64}$".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "steam_id": STEAM_ID,
            "duration": 3600,
        })))
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome = service_for(&server)
        .grant(&caller(&["11"]), STEAM_ID, moderator_grant())
        .await;

    assert!(matches!(&outcome, Outcome::Granted { role, .. } if role == "moderator"));
    assert!(outcome.is_success());
    hook.assert_async().await;
}

#[tokio::test]
async fn test_grant_webhook_failure_is_not_retried() {
    let mut server = Server::new_async().await;
    let hook = server
        .mock("POST", MODERATOR_HOOK_PATH)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let outcome = service_for(&server)
        .grant(&caller(&["10"]), STEAM_ID, moderator_grant())
        .await;

    assert_eq!(outcome, Outcome::ServiceUnavailable);
    hook.assert_async().await;
}

#[tokio::test]
async fn test_grant_without_permission_never_calls_webhook() {
    let mut server = Server::new_async().await;
    let hook = server
        .mock("POST", MODERATOR_HOOK_PATH)
        .expect(0)
        .create_async()
        .await;

    let outcome = service_for(&server)
        .grant(&caller(&["99"]), STEAM_ID, moderator_grant())
        .await;

    assert_eq!(outcome, Outcome::NoPermission);
    hook.assert_async().await;
}

#[tokio::test]
async fn test_grant_of_unknown_role_is_invalid_input() {
    let mut server = Server::new_async().await;
    let hook = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let command = GrantCommand {
        role: "vip".into(),
        ..moderator_grant()
    };
    let outcome = service_for(&server)
        .grant(&caller(&["10"]), STEAM_ID, command)
        .await;

    assert_eq!(outcome, Outcome::InvalidInput("Unknown role \"vip\"".into()));
    assert_eq!(render(&outcome), r#"Unknown role "vip""#);
    hook.assert_async().await;
}
