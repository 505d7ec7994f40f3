//! Protocol mapper error types.

use thiserror::Error;

/// Boxed error from a collaborator a mapper depends on.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while configuring or running a protocol mapper.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A required configuration key is missing or empty.
    #[error("mapper {mapper}: missing required config {key}")]
    MissingConfig {
        /// Mapper type ID.
        mapper: &'static str,
        /// Missing configuration key.
        key: &'static str,
    },

    /// A configuration key holds a value the mapper does not support.
    #[error("mapper {mapper}: unsupported value {value:?} for {key}")]
    UnsupportedConfigValue {
        /// Mapper type ID.
        mapper: &'static str,
        /// Configuration key.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The claim value could not be computed.
    #[error("mapper {mapper}: could not resolve claim {claim}")]
    ClaimResolution {
        /// Mapper type ID.
        mapper: &'static str,
        /// Target claim name.
        claim: String,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },
}

impl MapperError {
    /// Returns the ID of the mapper that raised the error.
    #[must_use]
    pub const fn mapper(&self) -> &'static str {
        match self {
            Self::MissingConfig { mapper, .. }
            | Self::UnsupportedConfigValue { mapper, .. }
            | Self::ClaimResolution { mapper, .. } => mapper,
        }
    }

    /// Returns whether the error comes from the mapper's configuration
    /// rather than from a runtime lookup.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingConfig { .. } | Self::UnsupportedConfigValue { .. }
        )
    }
}

/// Result type for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;
