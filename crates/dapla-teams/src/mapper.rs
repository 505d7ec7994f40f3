//! The Dapla teams protocol mapper.

use dapla_protocol_oidc::{
    ClaimMapper, ConfigProperty, MapperConfig, MapperContext, MapperError, MapperResult,
    ProtocolMapper, TOKEN_MAPPER_CATEGORY, claim_name_property, include_in_tokens_properties,
    mapper::keys::CLAIM_NAME,
};

use crate::service::{TeamApiImpl, resolve_teams};

/// Mapper type ID. Referenced by realm setup tooling, so it must stay stable.
pub const PROVIDER_ID: &str = "oidc-dapla-teams-mapper";

/// Default for [`keys::API_URL`].
pub const DEFAULT_API_URL: &str = "https://run.mocky.io";

/// Mapper configuration keys.
pub mod keys {
    /// Team source, `remote` or `static`.
    pub const API_IMPL: &str = "dapla-team-api.impl";
    /// Remote team API endpoint.
    pub const API_URL: &str = "dapla-team-api.url";
}

/// Writes the user's Dapla teams into a token claim as a JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct DaplaTeamsMapper;

impl DaplaTeamsMapper {
    fn api_impl(config: &MapperConfig) -> MapperResult<TeamApiImpl> {
        let Some(raw) = config.get_non_blank(keys::API_IMPL) else {
            return Ok(TeamApiImpl::default());
        };
        raw.parse::<TeamApiImpl>().map_err(|_| MapperError::UnsupportedConfigValue {
            mapper: PROVIDER_ID,
            key: keys::API_IMPL,
            value: raw.to_string(),
        })
    }
}

impl ProtocolMapper for DaplaTeamsMapper {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        concat!("Dapla Team API mapper (v", env!("CARGO_PKG_VERSION"), ")")
    }

    fn category(&self) -> &'static str {
        TOKEN_MAPPER_CATEGORY
    }

    fn help_text(&self) -> &'static str {
        "Retrieve the user's Dapla teams from Dapla Team API and add claim"
    }

    fn config_properties(&self) -> Vec<ConfigProperty> {
        let mut props = vec![claim_name_property()];
        props.extend(include_in_tokens_properties());
        props.push(
            ConfigProperty::list(
                keys::API_IMPL,
                "Dapla Team API Impl",
                vec![
                    TeamApiImpl::Remote.to_string(),
                    TeamApiImpl::Static.to_string(),
                ],
            )
            .with_help(
                "The API implementation. Select remote to query the Dapla Team API URL. \
                 Select static to use an offline, fixed team list instead.",
            )
            .with_default(TeamApiImpl::Remote.as_str()),
        );
        props.push(
            ConfigProperty::string(keys::API_URL, "Dapla Team API URL")
                .with_help("Root URL of the Dapla Team API. Not used by the static implementation.")
                .with_default(DEFAULT_API_URL),
        );
        props
    }

    fn validate_config(&self, config: &MapperConfig) -> MapperResult<()> {
        if config.claim_name().is_none() {
            return Err(MapperError::MissingConfig {
                mapper: PROVIDER_ID,
                key: CLAIM_NAME,
            });
        }
        Self::api_impl(config).map(|_| ())
    }
}

impl ClaimMapper for DaplaTeamsMapper {
    fn map_claim(
        &self,
        config: &MapperConfig,
        _context: &MapperContext<'_>,
    ) -> MapperResult<Option<serde_json::Value>> {
        let mode = Self::api_impl(config)?;
        let url = config.get_non_blank(keys::API_URL).unwrap_or(DEFAULT_API_URL);
        tracing::info!(instance = %config.name, %mode, "retrieving Dapla teams");

        let teams = resolve_teams(mode, Some(url)).map_err(|e| MapperError::ClaimResolution {
            mapper: PROVIDER_ID,
            claim: config.claim_name().unwrap_or_default().to_string(),
            source: Box::new(e),
        })?;

        Ok(Some(serde_json::Value::from(teams)))
    }
}
