//! Team sources.
//!
//! A [`TeamApiService`] answers which teams the current user belongs to.
//! [`StaticTeamApi`] serves a fixed list for offline use; [`RemoteTeamApi`]
//! asks an HTTP endpoint. Neither caches: every call is independent.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use url::Url;

use crate::error::{TeamApiError, TeamApiResult};

/// Teams returned by [`StaticTeamApi`].
pub const STATIC_TEAMS: [&str; 2] = ["demo-enhjoern-æ", "demo-enhjoern-ø"];

/// A source of team names.
pub trait TeamApiService: Send + Sync {
    /// Returns the team names, in the order the source reports them.
    ///
    /// # Errors
    ///
    /// Returns an error if the source could not be queried.
    fn teams(&self) -> TeamApiResult<Vec<String>>;
}

/// Offline team source with a fixed answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTeamApi;

impl TeamApiService for StaticTeamApi {
    fn teams(&self) -> TeamApiResult<Vec<String>> {
        Ok(STATIC_TEAMS.iter().map(|t| (*t).to_string()).collect())
    }
}

/// Wire shape of the remote team API response.
#[derive(Debug, Deserialize)]
struct TeamsResponse {
    teams: Vec<String>,
}

/// Team source backed by a blocking HTTP GET.
///
/// Uses the HTTP client's default timeout. Must not be created or dropped
/// on an async runtime thread.
#[derive(Debug, Clone)]
pub struct RemoteTeamApi {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl RemoteTeamApi {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`TeamApiError::InvalidUrl`] if `endpoint` does not parse and
    /// [`TeamApiError::Network`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str) -> TeamApiResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|source| TeamApiError::InvalidUrl {
            url: endpoint.to_string(),
            source,
        })?;
        let client = reqwest::blocking::Client::builder().build()?;

        tracing::info!(url = %endpoint, "using remote Dapla Team API");
        Ok(Self { client, endpoint })
    }
}

impl TeamApiService for RemoteTeamApi {
    fn teams(&self) -> TeamApiResult<Vec<String>> {
        let response = self.client.get(self.endpoint.clone()).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(TeamApiError::HttpStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text()?;
        let parsed: TeamsResponse = serde_json::from_str(&body)?;
        tracing::debug!(url = %self.endpoint, count = parsed.teams.len(), "fetched teams");
        Ok(parsed.teams)
    }
}

/// Which team source a mapper instance uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TeamApiImpl {
    /// Query an HTTP endpoint.
    #[default]
    Remote,
    /// Serve [`STATIC_TEAMS`].
    Static,
}

impl TeamApiImpl {
    /// The canonical configuration value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for TeamApiImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamApiImpl {
    type Err = TeamApiError;

    /// Accepts the canonical names and the legacy `mocky`/`dummy` spellings,
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> TeamApiResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "mocky" => Ok(Self::Remote),
            "static" | "dummy" => Ok(Self::Static),
            _ => Err(TeamApiError::UnsupportedImplementation(s.to_string())),
        }
    }
}

/// Resolves the team list with the source selected by `mode`.
///
/// `endpoint` is only read in [`TeamApiImpl::Remote`] mode, where it is
/// required.
///
/// # Errors
///
/// Returns [`TeamApiError::MissingEndpoint`] for remote mode without an
/// endpoint, otherwise whatever the selected source reports.
pub fn resolve_teams(mode: TeamApiImpl, endpoint: Option<&str>) -> TeamApiResult<Vec<String>> {
    match mode {
        TeamApiImpl::Static => {
            tracing::debug!("using static Dapla Team API");
            StaticTeamApi.teams()
        }
        TeamApiImpl::Remote => {
            let endpoint = endpoint.ok_or(TeamApiError::MissingEndpoint)?;
            RemoteTeamApi::new(endpoint)?.teams()
        }
    }
}
