//! Normalization policy.

use std::collections::HashSet;

use dapla_protocol_oidc::MapperConfig;

/// Mapper configuration keys read by [`NormalizationPolicy::from_mapper_config`].
pub mod keys {
    /// Boolean; prefix the short username with the email domain. Default `true`.
    pub const USE_DOMAIN_AS_PREFIX: &str = "short-username.use-domain-as-prefix";
    /// Comma-separated domains (without TLD) that never become a prefix.
    pub const DOMAINS_NOT_USED_AS_PREFIX: &str = "short-username.domains-not-used-as-prefix";
    /// Boolean; log mapper diagnostics at `info` instead of `debug`.
    pub const VERBOSE_LOGGING: &str = "short-username.verbose-logging";
}

/// How an email address is turned into a short username.
///
/// A domain that cannot be determined (no `.` after the `@`) never fails
/// normalization; the short username is then built from the local part
/// alone, exactly as for an excluded domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationPolicy {
    /// Prefix the local part with the domain (without TLD).
    pub use_domain_as_prefix: bool,

    /// Domains, as returned by
    /// [`domain_part_without_tld`](crate::email::domain_part_without_tld),
    /// that are never used as a prefix. Matched exactly and case-sensitively.
    pub excluded_domains: HashSet<String>,

    /// Log diagnostics at `info`. Has no effect on the result.
    pub verbose: bool,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self {
            use_domain_as_prefix: true,
            excluded_domains: HashSet::new(),
            verbose: false,
        }
    }
}

impl NormalizationPolicy {
    /// Creates the default policy: domain prefix on, nothing excluded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns the domain prefix on or off.
    #[must_use]
    pub const fn with_domain_prefix(mut self, use_domain_as_prefix: bool) -> Self {
        self.use_domain_as_prefix = use_domain_as_prefix;
        self
    }

    /// Adds domains that are never used as a prefix.
    #[must_use]
    pub fn with_excluded_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_domains
            .extend(domains.into_iter().map(Into::into));
        self
    }

    /// Enables verbose logging.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reads the policy from a mapper instance's configuration.
    ///
    /// Missing or malformed booleans fall back to the defaults.
    #[must_use]
    pub fn from_mapper_config(config: &MapperConfig) -> Self {
        Self {
            use_domain_as_prefix: config.get_bool(keys::USE_DOMAIN_AS_PREFIX).unwrap_or(true),
            excluded_domains: config
                .get(keys::DOMAINS_NOT_USED_AS_PREFIX)
                .map(parse_excluded_domains)
                .unwrap_or_default(),
            verbose: config.get_bool(keys::VERBOSE_LOGGING).unwrap_or(false),
        }
    }

    /// Returns whether `domain` must not be used as a prefix.
    #[must_use]
    pub fn is_excluded(&self, domain: &str) -> bool {
        self.excluded_domains.contains(domain)
    }
}

/// Parses a comma-separated domain list.
///
/// Entries are trimmed and empty entries dropped.
#[must_use]
pub fn parse_excluded_domains(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
