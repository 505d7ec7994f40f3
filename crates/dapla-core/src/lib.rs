//! # dapla-core
//!
//! Core configuration, error handling and logging for the Dapla protocol mappers.
//!
//! This crate provides the pieces shared by every mapper crate in the
//! workspace: the process-level [`Config`], the common [`Error`] type and
//! tracing initialization.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ClaimFailurePolicy, ClaimsConfig, Config, LoggingConfig};
pub use error::{Error, Result};
