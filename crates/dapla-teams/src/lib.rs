//! # dapla-teams
//!
//! Resolves the Dapla teams a user belongs to and exposes them as a token
//! claim.
//!
//! ## Modules
//!
//! - [`error`] - team API error types
//! - [`service`] - the static and remote team sources
//! - [`mapper`] - the `oidc-dapla-teams-mapper` protocol mapper

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod mapper;
pub mod service;

pub use error::{TeamApiError, TeamApiResult};
pub use mapper::DaplaTeamsMapper;
pub use service::{
    RemoteTeamApi, STATIC_TEAMS, StaticTeamApi, TeamApiImpl, TeamApiService, resolve_teams,
};
