//! End-to-end integration tests.
//!
//! These tests issue access, ID and userinfo claims through a registry
//! built by `dapla_mappers`, the way a host identity provider would.

mod common;
mod registry;
mod short_username;
mod teams;
