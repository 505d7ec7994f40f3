//! The short username protocol mapper.

use dapla_protocol_oidc::{
    ClaimMapper, ConfigProperty, MapperConfig, MapperContext, MapperError, MapperResult,
    ProtocolMapper, TOKEN_MAPPER_CATEGORY, claim_name_property, include_in_tokens_properties,
    mapper::keys::CLAIM_NAME,
};

use crate::normalize::{NormalizationError, normalize};
use crate::policy::{NormalizationPolicy, keys};

/// Mapper type ID. Referenced by realm setup tooling, so it must stay stable.
pub const PROVIDER_ID: &str = "oidc-dapla-short-username-mapper";

/// Writes the user's short username into a token claim.
///
/// The email is taken from the user in the mapper context. When no short
/// username can be derived the claim is left out and the reason is logged;
/// this mapper never fails token issuance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortUsernameMapper;

impl ProtocolMapper for ShortUsernameMapper {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        concat!("Dapla short username mapper (v", env!("CARGO_PKG_VERSION"), ")")
    }

    fn category(&self) -> &'static str {
        TOKEN_MAPPER_CATEGORY
    }

    fn help_text(&self) -> &'static str {
        "Transform a user's email to a short username claim (RFC-1123 compliant string). \
         Example: john.doe@example.com -> example-john-doe"
    }

    fn config_properties(&self) -> Vec<ConfigProperty> {
        let mut props = vec![claim_name_property()];
        props.extend(include_in_tokens_properties());
        props.extend([
            ConfigProperty::boolean(keys::VERBOSE_LOGGING, "Verbose logging").with_help(
                "Enable this to log mapper diagnostics at info level. Useful for pinpointing \
                 problems without changing the log configuration.",
            ),
            ConfigProperty::boolean(keys::USE_DOMAIN_AS_PREFIX, "Use domain as prefix?")
                .with_help(
                    "Include the domain part of the email as a prefix to the short username. \
                     Combine with 'Domains not used as prefix' to leave out selected domains.",
                )
                .with_default("true"),
            ConfigProperty::string(keys::DOMAINS_NOT_USED_AS_PREFIX, "Domains not used as prefix")
                .with_help(
                    "Only relevant if 'Use domain as prefix' is enabled. Comma-separated list of \
                     domains (without top-level domain) that are never used as a prefix, e.g. \
                     your primary domain so that only users from other domains get a prefix. \
                     Leave empty to prefix all short usernames.",
                ),
        ]);
        props
    }

    fn validate_config(&self, config: &MapperConfig) -> MapperResult<()> {
        if config.claim_name().is_none() {
            return Err(MapperError::MissingConfig {
                mapper: PROVIDER_ID,
                key: CLAIM_NAME,
            });
        }
        Ok(())
    }
}

impl ClaimMapper for ShortUsernameMapper {
    fn map_claim(
        &self,
        config: &MapperConfig,
        context: &MapperContext<'_>,
    ) -> MapperResult<Option<serde_json::Value>> {
        let policy = NormalizationPolicy::from_mapper_config(config);
        let claim = config.claim_name().unwrap_or_default();
        verbose_log!(policy.verbose, claim, instance = %config.name, "mapping short username");

        match normalize(context.email(), &policy) {
            Ok(short_username) => {
                verbose_log!(policy.verbose, claim, %short_username, "short username claim set");
                Ok(Some(serde_json::Value::String(short_username)))
            }
            Err(NormalizationError::NoEmail) => {
                tracing::info!(claim, "email was missing or blank, unable to deduce short username");
                Ok(None)
            }
            Err(error) => {
                tracing::info!(claim, %error, "could not set short username claim");
                Ok(None)
            }
        }
    }
}
