//! Email address decomposition.
//!
//! Only the first `@` and the last `.` after it are located. Anything that
//! cannot be found is reported as absent. Blank input is not special-cased
//! here; callers screen it out.

/// An email address split into the parts used to build a short username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailAddress<'a> {
    local_part: &'a str,
    domain_part: Option<&'a str>,
}

impl<'a> EmailAddress<'a> {
    /// Parses `raw`, returning `None` when it has no usable local part.
    ///
    /// A missing or TLD-only domain does not fail the parse; it leaves
    /// [`Self::domain_part`] empty.
    #[must_use]
    pub fn parse(raw: &'a str) -> Option<Self> {
        Some(Self {
            local_part: local_part(raw)?,
            domain_part: domain_part_without_tld(raw),
        })
    }

    /// The part before the first `@`. Never empty.
    #[must_use]
    pub const fn local_part(&self) -> &'a str {
        self.local_part
    }

    /// The part after the first `@` with its last label removed.
    #[must_use]
    pub const fn domain_part(&self) -> Option<&'a str> {
        self.domain_part
    }
}

/// Returns the substring before the first `@`.
///
/// `None` if there is no `@` or nothing precedes it.
#[must_use]
pub fn local_part(email: &str) -> Option<&str> {
    let (local, _) = email.split_once('@')?;
    (!local.is_empty()).then_some(local)
}

/// Returns the substring after the first `@` with the top-level domain
/// (the last `.`-delimited label) removed.
///
/// `None` if there is no `@`, no `.` after it, or nothing is left once the
/// TLD is stripped.
///
/// ```
/// use dapla_short_username::email::domain_part_without_tld;
///
/// assert_eq!(domain_part_without_tld("a@example.com"), Some("example"));
/// assert_eq!(domain_part_without_tld("a@foo.example.co.uk"), Some("foo.example.co"));
/// assert_eq!(domain_part_without_tld("a@example"), None);
/// ```
#[must_use]
pub fn domain_part_without_tld(email: &str) -> Option<&str> {
    let (_, domain) = email.split_once('@')?;
    let (without_tld, _) = domain.rsplit_once('.')?;
    (!without_tld.is_empty()).then_some(without_tld)
}
