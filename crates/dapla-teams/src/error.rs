//! Team API error types.

use thiserror::Error;

/// Errors raised while resolving teams.
#[derive(Debug, Error)]
pub enum TeamApiError {
    /// The request could not be sent or the response body not read.
    #[error("error fetching teams: {0}")]
    Network(#[from] reqwest::Error),

    /// The team API answered with a non-2xx status.
    #[error("error fetching teams from {url}: unexpected status {status}")]
    HttpStatus {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The response body is not `{"teams": [string, ...]}`.
    #[error("malformed team API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured endpoint is not a valid URL.
    #[error("invalid team API url {url:?}: {source}")]
    InvalidUrl {
        /// The rejected value.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// Remote mode was selected without an endpoint.
    #[error("remote team API selected but no url given")]
    MissingEndpoint,

    /// The team API implementation name is not recognized.
    #[error("unsupported team API implementation: {0}")]
    UnsupportedImplementation(String),
}

impl TeamApiError {
    /// Returns true for failures caused by configuration rather than the
    /// remote side.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::MissingEndpoint | Self::UnsupportedImplementation(_)
        )
    }
}

/// Result type for team API operations.
pub type TeamApiResult<T> = Result<T, TeamApiError>;
