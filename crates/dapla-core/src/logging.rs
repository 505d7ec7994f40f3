//! Tracing subscriber setup.
//!
//! Mapper crates only emit `tracing` events. Whoever hosts them decides
//! where the events go; these helpers install the stock fmt subscriber.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Builds an [`EnvFilter`] from the configured directive.
///
/// # Errors
///
/// Returns [`Error::Config`] if the directive cannot be parsed.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.filter)
        .map_err(|e| Error::Config(format!("invalid log filter {:?}: {e}", config.filter)))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(config)?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

/// Installs a test-writer subscriber, ignoring an already installed one.
///
/// Intended for test harnesses, where several tests race to initialize
/// logging.
pub fn try_init_for_tests(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
