// SPDX-License-Identifier: Apache-2.0

//! Redirect-target allow-listing.
//!
//! A `next` parameter is accepted only if it parses as an absolute http(s)
//! URL whose host is in the configured [`AllowedHostSet`]. The accepted
//! value is the re-serialized parse result, never the raw input, so text
//! that the URL parser normalizes away (tabs, newlines, backslashes,
//! mixed-case hosts) cannot reach the `Location` header.
//!
//! Relative redirects (`/home`) do not parse without a base and are
//! rejected as [`GuardError::MalformedTarget`]; same-origin redirects are
//! the caller's business.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};
use url::{Host, Url};

use crate::error::{ConfigError, GuardError};

/// Hostnames that redirect and fetch targets may point at.
///
/// Entries are normalized the same way the URL parser normalizes hosts
/// (lower-cased, IDNA to ASCII, one trailing dot dropped), so comparison is
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedHostSet {
    hosts: BTreeSet<String>,
}

impl AllowedHostSet {
    /// Builds the set from configured host names.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidHost`] for an empty entry, a wildcard, or one
    /// carrying a scheme, port, path or userinfo.
    pub fn new<I, S>(hosts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for entry in hosts {
            let entry = entry.as_ref();
            let normalized = normalize_entry(entry).ok_or_else(|| ConfigError::InvalidHost {
                host: entry.to_string(),
            })?;
            set.insert(normalized);
        }
        Ok(Self { hosts: set })
    }

    /// Whether `host` is allowed. Accepts any case and a trailing dot.
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        normalize_entry(host).is_some_and(|h| self.hosts.contains(&h))
    }

    /// Allowed hosts in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    /// Number of allowed hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// True if no host is allowed, in which case every target is rejected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Validates a redirect target against this set. See [`validate_redirect`].
    pub fn validate_redirect(&self, next: &str) -> Result<ValidatedRedirect, GuardError> {
        validate_redirect(next, self)
    }
}

/// Absolute http(s) URL whose host is in an [`AllowedHostSet`].
///
/// Only [`validate_redirect`] creates values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedRedirect {
    url: Url,
}

impl ValidatedRedirect {
    /// Serialized URL, suitable for a `Location` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The parsed URL.
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Host the redirect points at.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Consumes the value, returning the parsed URL.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.url
    }
}

impl fmt::Display for ValidatedRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Validates an untrusted redirect target.
///
/// Steps: parse as an absolute URL, require scheme http or https, require a
/// host, require that host to be in `allowed`. The port is not compared.
///
/// # Errors
///
/// - [`GuardError::MalformedTarget`] if `next` does not parse or has no host
/// - [`GuardError::UnsupportedScheme`] for any scheme besides http/https
/// - [`GuardError::UntrustedHost`] if the host is not allowed
#[instrument(level = "debug", skip(next, allowed), fields(len = next.len()))]
pub fn validate_redirect(
    next: &str,
    allowed: &AllowedHostSet,
) -> Result<ValidatedRedirect, GuardError> {
    let url = check_target(next, allowed).inspect_err(|e| {
        debug!(kind = e.kind(), error = %e, "Rejected redirect target");
    })?;
    Ok(ValidatedRedirect { url })
}

/// Shared parse, scheme and host check for redirect and fetch targets.
pub(crate) fn check_target(raw: &str, allowed: &AllowedHostSet) -> Result<Url, GuardError> {
    let url = Url::parse(raw).map_err(|e| GuardError::MalformedTarget {
        reason: e.to_string(),
    })?;

    let scheme = url.scheme();
    if !matches!(scheme, "http" | "https") {
        return Err(GuardError::UnsupportedScheme {
            scheme: scheme.to_string(),
        });
    }

    let Some(host) = url.host() else {
        return Err(GuardError::MalformedTarget {
            reason: "target has no host".to_string(),
        });
    };

    let host = strip_trailing_dot(host.to_string());
    if !allowed.hosts.contains(&host) {
        return Err(GuardError::UntrustedHost { host });
    }

    Ok(url)
}

/// Normalizes a configured host through the same parser used for URLs.
fn normalize_entry(entry: &str) -> Option<String> {
    let lowered = strip_trailing_dot(entry.trim().to_ascii_lowercase());
    // Wildcards are not supported; a literal `*` entry could never match.
    if lowered.is_empty() || lowered.contains('*') {
        return None;
    }
    Host::parse(&lowered)
        .ok()
        .map(|host| strip_trailing_dot(host.to_string()))
}

fn strip_trailing_dot(mut host: String) -> String {
    if host.ends_with('.') {
        host.pop();
    }
    host
}
