// SPDX-License-Identifier: Apache-2.0

//! Outbound HTTP policy.
//!
//! TLS verification is a configuration value, on by default. Turning it off
//! is possible only through [`TransportConfig::verify_tls`] and is logged at
//! `warn` every time a client is built. Fetch targets go through the same
//! allow-list check as redirects.
//!
//! Clients do not follow redirects. A caller that wants to follow one runs
//! the `Location` value through [`check_outbound`] and issues a new request.

use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::config::TransportConfig;
use crate::error::{ConfigError, GuardError};
use crate::redirect::{AllowedHostSet, check_target};

/// Builds an HTTP client honoring the transport settings.
///
/// # Errors
///
/// [`ConfigError::HttpClient`] if the TLS backend cannot be initialized.
pub fn build_http_client(config: &TransportConfig) -> Result<reqwest::Client, ConfigError> {
    if !config.verify_tls {
        warn!("TLS certificate verification is disabled by configuration");
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .https_only(config.https_only)
        .danger_accept_invalid_certs(!config.verify_tls)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    debug!(
        verify_tls = config.verify_tls,
        timeout_seconds = config.timeout_seconds,
        "HTTP client built"
    );
    Ok(client)
}

/// Checks an outbound request target against the allowed hosts.
///
/// Same rules as [`crate::redirect::validate_redirect`]: absolute http(s)
/// URL with an allowed host. Returns the parsed URL to hand to the client.
pub fn check_outbound(url: &str, allowed: &AllowedHostSet) -> Result<Url, GuardError> {
    check_target(url, allowed).inspect_err(|e| {
        debug!(kind = e.kind(), error = %e, "Rejected outbound target");
    })
}
