//! Dapla teams claim tests.

use dapla_core::ClaimFailurePolicy;
use dapla_protocol_oidc::MapperError;
use dapla_teams::TeamApiError;
use dapla_teams::mapper::keys;
use serde_json::json;

use crate::common::{TestEnv, start_team_api, teams_config, user};

#[test]
fn test_static_teams_in_all_tokens() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [teams_config("dapla.teams", "static")];

    let tokens = env.issue(&user(Some("kari@ssb.no")), &configs)?;

    let expected = json!({"teams": ["demo-enhjoern-æ", "demo-enhjoern-ø"]});
    assert_eq!(tokens.access.claim("dapla"), Some(&expected));
    assert_eq!(tokens.id.claim("dapla"), Some(&expected));
    assert_eq!(tokens.userinfo.claim("dapla"), Some(&expected));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_teams_claim() -> anyhow::Result<()> {
    let team_api = start_team_api(200, json!({"teams": ["team-x", "team-y"]})).await;
    let configs = [teams_config("teams", "remote").with_config(keys::API_URL, team_api.uri())];

    let tokens = tokio::task::spawn_blocking(move || {
        TestEnv::new().issue(&user(Some("kari@ssb.no")), &configs)
    })
    .await??;

    assert_eq!(tokens.access.claim("teams"), Some(&json!(["team-x", "team-y"])));
    assert_eq!(tokens.id.claim("teams"), Some(&json!(["team-x", "team-y"])));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_failure_drops_claim_by_default() -> anyhow::Result<()> {
    let team_api = start_team_api(503, json!({"error": "unavailable"})).await;
    let configs = [
        teams_config("teams", "remote").with_config(keys::API_URL, team_api.uri()),
        crate::common::short_username_config("short_username"),
    ];

    let tokens = tokio::task::spawn_blocking(move || {
        TestEnv::new().issue(&user(Some("kari@ssb.no")), &configs)
    })
    .await??;

    assert_eq!(tokens.access.claim("teams"), None);
    assert_eq!(tokens.access.claim("short_username"), Some(&json!("ssb-kari")));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_failure_aborts_when_configured() -> anyhow::Result<()> {
    let team_api = start_team_api(200, json!({"teams": "not-a-list"})).await;
    let configs = [teams_config("teams", "remote").with_config(keys::API_URL, team_api.uri())];

    let result = tokio::task::spawn_blocking(move || {
        TestEnv::with_policy(ClaimFailurePolicy::Abort).issue(&user(Some("kari@ssb.no")), &configs)
    })
    .await?;

    let err = result.unwrap_err();
    let Some(MapperError::ClaimResolution { source, .. }) = err.downcast_ref::<MapperError>()
    else {
        panic!("expected a claim resolution error");
    };
    assert!(matches!(
        source.downcast_ref::<TeamApiError>(),
        Some(TeamApiError::Parse(_))
    ));
    Ok(())
}

#[test]
fn test_unsupported_implementation_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::with_policy(ClaimFailurePolicy::Abort);
    let configs = [teams_config("teams", "ldap")];

    assert!(env.registry.validate(&configs).is_err());

    let err = env.issue(&user(Some("kari@ssb.no")), &configs).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MapperError>(),
        Some(MapperError::UnsupportedConfigValue { .. })
    ));
    Ok(())
}

#[test]
fn test_unsupported_implementation_is_dropped_by_default() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [teams_config("teams", "ldap")];

    let tokens = env.issue(&user(Some("kari@ssb.no")), &configs)?;

    assert_eq!(tokens.access.claim("teams"), None);
    Ok(())
}
