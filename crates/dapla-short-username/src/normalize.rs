//! Email to short username normalization.

use thiserror::Error;

use crate::email::EmailAddress;
use crate::policy::NormalizationPolicy;

/// Why no short username could be derived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// The email is missing, empty or blank.
    #[error("email was missing or blank")]
    NoEmail,

    /// The email has no `@` or nothing before it.
    #[error("unable to retrieve local part from email {email:?}")]
    UnparseableLocalPart {
        /// The offending email.
        email: String,
    },
}

/// Derives the short username for `email` under `policy`.
///
/// # Errors
///
/// Returns [`NormalizationError::NoEmail`] for a missing or blank email and
/// [`NormalizationError::UnparseableLocalPart`] when no local part can be
/// found.
pub fn normalize(
    email: Option<&str>,
    policy: &NormalizationPolicy,
) -> Result<String, NormalizationError> {
    let email = email
        .filter(|e| !e.trim().is_empty())
        .ok_or(NormalizationError::NoEmail)?;

    let parsed = EmailAddress::parse(email).ok_or_else(|| {
        NormalizationError::UnparseableLocalPart {
            email: email.to_string(),
        }
    })?;
    let local = parsed.local_part();

    if !policy.use_domain_as_prefix {
        return Ok(as_rfc1123(local));
    }

    let candidate = match parsed.domain_part() {
        None => {
            verbose_log!(policy.verbose, email, "no domain found, short username is not prefixed");
            local.to_string()
        }
        Some(domain) if policy.is_excluded(domain) => {
            verbose_log!(policy.verbose, domain, "domain is excluded from prefixing");
            local.to_string()
        }
        Some(domain) => format!("{domain}-{local}"),
    };

    Ok(as_rfc1123(&candidate))
}

/// Replaces every character that is not an ASCII letter or digit with `-`
/// and lowercases the rest.
///
/// The output only contains `[a-z0-9-]`, so applying it twice changes
/// nothing.
#[must_use]
pub fn as_rfc1123(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
