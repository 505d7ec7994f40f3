//! # dapla-mappers
//!
//! Entry point for hosts: builds a [`ProtocolMapperRegistry`] with every
//! Dapla protocol mapper registered.
//!
//! ```
//! let registry = dapla_mappers::registry();
//! assert_eq!(
//!     registry.mapper_ids(),
//!     ["oidc-dapla-short-username-mapper", "oidc-dapla-teams-mapper"]
//! );
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::sync::Arc;

use dapla_core::{ClaimFailurePolicy, Config};
use dapla_protocol_oidc::ProtocolMapperRegistry;

pub use dapla_short_username::ShortUsernameMapper;
pub use dapla_teams::DaplaTeamsMapper;

/// Builds a registry holding all Dapla mappers with the default
/// failure policy.
#[must_use]
pub fn registry() -> ProtocolMapperRegistry {
    registry_with(ClaimFailurePolicy::default())
}

/// Builds a registry holding all Dapla mappers with `failure_policy`.
#[must_use]
pub fn registry_with(failure_policy: ClaimFailurePolicy) -> ProtocolMapperRegistry {
    let mut registry = ProtocolMapperRegistry::new().with_failure_policy(failure_policy);
    registry.register_mapper(Arc::new(ShortUsernameMapper));
    registry.register_mapper(Arc::new(DaplaTeamsMapper));

    tracing::info!(
        mappers = registry.mapper_ids().len(),
        %failure_policy,
        "Dapla protocol mappers registered"
    );
    registry
}

/// Builds a registry using the claim settings from process configuration.
#[must_use]
pub fn registry_from_config(config: &Config) -> ProtocolMapperRegistry {
    registry_with(config.claims.failure_policy)
}
