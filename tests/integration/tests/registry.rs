//! Registry behaviour across mapper instances.

use dapla_protocol_oidc::MapperConfig;
use serde_json::json;

use crate::common::{TestEnv, access_token_only, short_username_config, teams_config, user};

#[test]
fn test_registry_lists_dapla_mappers() {
    let env = TestEnv::new();
    assert_eq!(
        env.registry.mapper_ids(),
        vec!["oidc-dapla-short-username-mapper", "oidc-dapla-teams-mapper"]
    );
}

#[test]
fn test_include_flags_select_tokens() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [access_token_only(short_username_config("short_username"))];

    let tokens = env.issue(&user(Some("kari@ssb.no")), &configs)?;

    assert_eq!(tokens.access.claim("short_username"), Some(&json!("ssb-kari")));
    assert_eq!(tokens.id.claim("short_username"), None);
    assert_eq!(tokens.userinfo.claim("short_username"), None);
    Ok(())
}

#[test]
fn test_both_mappers_share_nested_claim() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [
        short_username_config("dapla.short_username"),
        teams_config("dapla.teams", "static"),
    ];

    let tokens = env.issue(&user(Some("kari@ssb.no")), &configs)?;

    assert_eq!(
        tokens.id.claim("dapla"),
        Some(&json!({
            "short_username": "ssb-kari",
            "teams": ["demo-enhjoern-æ", "demo-enhjoern-ø"],
        }))
    );
    Ok(())
}

#[test]
fn test_unknown_mapper_type_is_skipped() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [
        MapperConfig::new("legacy", "dapla-teams-mapper").with_config("claim.name", "legacy"),
        short_username_config("short_username"),
    ];

    let tokens = env.issue(&user(Some("kari@ssb.no")), &configs)?;

    assert_eq!(tokens.access.claim("legacy"), None);
    assert_eq!(tokens.access.claim("short_username"), Some(&json!("ssb-kari")));
    Ok(())
}

#[test]
fn test_claims_serialize_flat() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [short_username_config("short_username")];

    let tokens = env.issue(&user(Some("kari@ssb.no")), &configs)?;
    let json = serde_json::to_value(&tokens.access)?;

    assert_eq!(json["short_username"], json!("ssb-kari"));
    assert_eq!(json["azp"], json!("dapla-lab"));
    Ok(())
}

#[test]
fn test_claim_name_with_empty_segment_is_skipped() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [
        short_username_config("dapla."),
        teams_config("dapla.teams", "static"),
    ];

    let tokens = env.issue(&user(Some("kari@ssb.no")), &configs)?;

    assert_eq!(
        tokens.access.claim("dapla"),
        Some(&json!({"teams": ["demo-enhjoern-æ", "demo-enhjoern-ø"]}))
    );
    Ok(())
}
