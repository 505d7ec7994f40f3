//! Token claim sets that protocol mappers write into.
//!
//! Only the registered claims the host fills in are fields. Mapper output
//! lands in the flattened `additional` map and is read back with `claim`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mapper-contributed claims, keyed by top-level claim name.
pub type ClaimMap = HashMap<String, serde_json::Value>;

/// Access token claims. Userinfo responses use the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Issuer.
    pub iss: String,

    /// Subject.
    pub sub: String,

    /// Expiry, seconds since the epoch.
    pub exp: i64,

    /// Issue time, seconds since the epoch.
    pub iat: i64,

    /// Client the token was issued to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,

    /// Space-separated granted scopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Mapper output.
    #[serde(flatten)]
    pub additional: ClaimMap,
}

impl AccessTokenClaims {
    /// Creates claims issued now and expiring at `expires_at`.
    #[must_use]
    pub fn new(issuer: String, subject: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            iss: issuer,
            sub: subject,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            azp: None,
            scope: None,
            additional: ClaimMap::new(),
        }
    }

    /// Sets `azp`.
    #[must_use]
    pub fn with_azp(mut self, client_id: impl Into<String>) -> Self {
        self.azp = Some(client_id.into());
        self
    }

    /// Sets `scope`.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Returns a mapper-contributed claim.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.additional.get(name)
    }
}

/// ID token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Issuer.
    pub iss: String,

    /// Subject.
    pub sub: String,

    /// Client the token was issued to.
    pub aud: String,

    /// Expiry, seconds since the epoch.
    pub exp: i64,

    /// Issue time, seconds since the epoch.
    pub iat: i64,

    /// Nonce echoed from the authentication request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Mapper output.
    #[serde(flatten)]
    pub additional: ClaimMap,
}

impl IdTokenClaims {
    /// Creates claims for `audience`, issued now and expiring at
    /// `expires_at`.
    #[must_use]
    pub fn new(
        issuer: String,
        subject: String,
        audience: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            iss: issuer,
            sub: subject,
            aud: audience.into(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            nonce: None,
            additional: ClaimMap::new(),
        }
    }

    /// Sets `nonce`.
    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Returns a mapper-contributed claim.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.additional.get(name)
    }
}
