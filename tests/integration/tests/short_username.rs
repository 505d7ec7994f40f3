//! Short username claim tests.

use dapla_short_username::policy::keys;
use serde_json::json;

use crate::common::{TestEnv, short_username_config, user};

#[test]
fn test_short_username_in_all_tokens() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [short_username_config("short_username")];

    let tokens = env.issue(&user(Some("john.doe@example.com")), &configs)?;

    let expected = json!("example-john-doe");
    assert_eq!(tokens.access.claim("short_username"), Some(&expected));
    assert_eq!(tokens.id.claim("short_username"), Some(&expected));
    assert_eq!(tokens.userinfo.claim("short_username"), Some(&expected));
    Ok(())
}

#[test]
fn test_short_username_without_prefix() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [short_username_config("short_username")
        .with_config(keys::USE_DOMAIN_AS_PREFIX, "false")];

    let tokens = env.issue(&user(Some("John.Doe@Example.com")), &configs)?;

    assert_eq!(tokens.access.claim("short_username"), Some(&json!("john-doe")));
    Ok(())
}

#[test]
fn test_excluded_domain_only_prefixes_other_domains() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [short_username_config("short_username")
        .with_config(keys::DOMAINS_NOT_USED_AS_PREFIX, "ssb, ")
        .with_config(keys::VERBOSE_LOGGING, "true")];

    let internal = env.issue(&user(Some("kari.nordmann@ssb.no")), &configs)?;
    let external = env.issue(&user(Some("kari.nordmann@partner.com")), &configs)?;

    assert_eq!(internal.access.claim("short_username"), Some(&json!("kari-nordmann")));
    assert_eq!(
        external.access.claim("short_username"),
        Some(&json!("partner-kari-nordmann"))
    );
    Ok(())
}

#[test]
fn test_domain_without_tld_falls_back_to_local_part() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [short_username_config("short_username")];

    let tokens = env.issue(&user(Some("john.doe@example")), &configs)?;

    assert_eq!(tokens.access.claim("short_username"), Some(&json!("john-doe")));
    Ok(())
}

#[test]
fn test_missing_email_omits_claim_without_failing() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [short_username_config("short_username")];

    for email in [None, Some(""), Some("   "), Some("not-an-email")] {
        let tokens = env.issue(&user(email), &configs)?;
        assert_eq!(tokens.access.claim("short_username"), None);
        assert_eq!(tokens.id.claim("short_username"), None);
        assert_eq!(tokens.userinfo.claim("short_username"), None);
    }
    Ok(())
}

#[test]
fn test_nested_claim_name() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let configs = [short_username_config("dapla.short_username")];

    let tokens = env.issue(&user(Some("ola@stat.ssb.no")), &configs)?;

    assert_eq!(
        tokens.access.claim("dapla"),
        Some(&json!({"short_username": "stat-ssb-ola"}))
    );
    Ok(())
}
