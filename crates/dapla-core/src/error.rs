//! Error handling shared by the Dapla mapper crates.
//!
//! Errors here describe problems with the process itself (bad configuration,
//! logging setup). Failures while computing a claim are reported by the
//! mapper crates with their own error types.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid value for a named setting.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// The global tracing subscriber could not be installed.
    #[error("logging initialization failed: {0}")]
    Logging(String),
}

impl Error {
    /// Creates an [`Error::InvalidValue`].
    #[must_use]
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns whether this error was caused by operator-supplied configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidValue { .. })
    }
}
