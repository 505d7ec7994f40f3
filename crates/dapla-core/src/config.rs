//! Process configuration for hosts embedding the Dapla mappers.
//!
//! Per-mapper settings live in each mapper instance's configuration map.
//! This module covers the settings that apply to the whole process: log
//! filtering and what happens when a mapper fails to compute its claim.
//!
//! Values can be loaded from environment variables:
//!
//! | variable | setting |
//! |---|---|
//! | `DAPLA_LOG` (falls back to `RUST_LOG`) | [`LoggingConfig::filter`] |
//! | `DAPLA_CLAIM_FAILURE_POLICY` | [`ClaimsConfig::failure_policy`] |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DAPLA_LOG";

/// Environment variable holding the claim failure policy.
pub const CLAIM_FAILURE_POLICY_ENV: &str = "DAPLA_CLAIM_FAILURE_POLICY";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Claim computation configuration.
    pub claims: ClaimsConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"info,dapla_teams=debug"`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Claim computation configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    /// What to do when a mapper returns an error.
    pub failure_policy: ClaimFailurePolicy,
}

/// Behaviour when a mapper fails to compute its claim.
///
/// Token issuance must not fail because an enrichment claim could not be
/// computed, so the default is to drop the claim and keep going.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimFailurePolicy {
    /// Log the error, leave the claim out and continue with the next mapper.
    #[default]
    DropClaim,
    /// Return the error to the caller, aborting claim computation.
    Abort,
}

impl ClaimFailurePolicy {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DropClaim => "drop_claim",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for ClaimFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimFailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop_claim" | "drop-claim" | "drop" => Ok(Self::DropClaim),
            "abort" => Ok(Self::Abort),
            _ => Err(Error::invalid_value(CLAIM_FAILURE_POLICY_ENV, s)),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unrecognized value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but unrecognized.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(LOG_ENV).or_else(|| lookup("RUST_LOG"))
            && !filter.trim().is_empty()
        {
            config.logging.filter = filter;
        }

        if let Some(policy) = lookup(CLAIM_FAILURE_POLICY_ENV)
            && !policy.trim().is_empty()
        {
            config.claims.failure_policy = policy.parse()?;
        }

        Ok(config)
    }
}
