//! Common test utilities and fixtures.

use chrono::{Duration, Utc};
use dapla_core::ClaimFailurePolicy;
use dapla_protocol_oidc::mapper::keys::{
    ACCESS_TOKEN_CLAIM, CLAIM_NAME, ID_TOKEN_CLAIM, USERINFO_TOKEN_CLAIM,
};
use dapla_protocol_oidc::{
    AccessTokenClaims, IdTokenClaims, MapperConfig, MapperContext, ProtocolMapperRegistry,
    UserInfo,
};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ISSUER: &str = "https://auth.dapla.example.com/realms/dapla";
pub const REALM: &str = "dapla";
pub const CLIENT_ID: &str = "dapla-lab";

/// A registry plus the request parameters a host would pass to it.
pub struct TestEnv {
    pub registry: ProtocolMapperRegistry,
    pub scopes: Vec<String>,
}

/// Claims produced by one token issuance.
#[derive(Debug)]
pub struct IssuedTokens {
    pub access: AccessTokenClaims,
    pub id: IdTokenClaims,
    pub userinfo: AccessTokenClaims,
}

impl TestEnv {
    /// Creates an environment with the default failure policy.
    pub fn new() -> Self {
        Self::with_policy(ClaimFailurePolicy::default())
    }

    /// Creates an environment whose registry uses `policy`.
    pub fn with_policy(policy: ClaimFailurePolicy) -> Self {
        dapla_core::logging::try_init_for_tests("info");
        Self {
            registry: dapla_mappers::registry_with(policy),
            scopes: vec!["openid".to_string(), "email".to_string()],
        }
    }

    /// Runs every configured mapper for all three token types.
    pub fn issue(&self, user: &UserInfo, configs: &[MapperConfig]) -> anyhow::Result<IssuedTokens> {
        let context = MapperContext::new(REALM, &self.scopes).with_user(user);
        let expires_at = Utc::now() + Duration::minutes(5);

        let mut access = AccessTokenClaims::new(ISSUER.to_string(), user.id.to_string(), expires_at)
            .with_azp(CLIENT_ID)
            .with_scope(self.scopes.join(" "));
        let mut id = IdTokenClaims::new(ISSUER.to_string(), user.id.to_string(), CLIENT_ID, expires_at);
        let mut userinfo = AccessTokenClaims::new(ISSUER.to_string(), user.id.to_string(), expires_at);

        self.registry
            .apply_access_token_mappers(&mut access, configs, &context)?;
        self.registry.apply_id_token_mappers(&mut id, configs, &context)?;
        self.registry
            .apply_userinfo_mappers(&mut userinfo, configs, &context)?;

        Ok(IssuedTokens {
            access,
            id,
            userinfo,
        })
    }
}

/// A user with the given email.
pub fn user(email: Option<&str>) -> UserInfo {
    let mut user = UserInfo::new("kari");
    user.email = email.map(str::to_string);
    user
}

/// A short username mapper instance writing to `claim`.
pub fn short_username_config(claim: &str) -> MapperConfig {
    MapperConfig::new("short username", dapla_short_username::mapper::PROVIDER_ID)
        .with_config(CLAIM_NAME, claim)
}

/// A teams mapper instance writing to `claim` with the given source.
pub fn teams_config(claim: &str, api_impl: &str) -> MapperConfig {
    MapperConfig::new("dapla teams", dapla_teams::mapper::PROVIDER_ID)
        .with_config(CLAIM_NAME, claim)
        .with_config(dapla_teams::mapper::keys::API_IMPL, api_impl)
}

/// Limits `config` to the access token.
pub fn access_token_only(config: MapperConfig) -> MapperConfig {
    config
        .with_config(ACCESS_TOKEN_CLAIM, "true")
        .with_config(ID_TOKEN_CLAIM, "false")
        .with_config(USERINFO_TOKEN_CLAIM, "false")
}

/// Starts a team API answering every GET with `status` and `body`.
pub async fn start_team_api(status: u16, body: serde_json::Value) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&mock_server)
        .await;

    mock_server
}
