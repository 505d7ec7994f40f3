//! # dapla-short-username
//!
//! Derives a short, [RFC-1123](https://datatracker.ietf.org/doc/html/rfc1123)
//! compliant username from a user's email address and exposes it as a token
//! claim.
//!
//! `john.doe@example.com` becomes `example-john-doe`, or `john-doe` when the
//! domain prefix is disabled or the domain is excluded from prefixing.
//!
//! ## Modules
//!
//! - [`email`] - splits an email into local part and domain without TLD
//! - [`policy`] - the normalization policy and its mapper configuration keys
//! - [`normalize`] - the normalization algorithm and RFC-1123 sanitization
//! - [`mapper`] - the `oidc-dapla-short-username-mapper` protocol mapper

#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Logs at `info` when `$verbose` is set, at `debug` otherwise.
macro_rules! verbose_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod email;
pub mod mapper;
pub mod normalize;
pub mod policy;

pub use email::EmailAddress;
pub use mapper::ShortUsernameMapper;
pub use normalize::{NormalizationError, as_rfc1123, normalize};
pub use policy::{NormalizationPolicy, parse_excluded_domains};
