// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to the library's error types and appends a hint
//! per variant. The library's `Display` carries the detail; the hint tells
//! the user what to change.

use anyhow::Error;
use reqguard_core::config::config_file_path;
use reqguard_core::{ConfigError, GuardError, PasswordError};

/// Formats an error for CLI display with helpful hints.
///
/// If the error is none of the library's types, returns the original error
/// chain.
pub fn format_error(error: &Error) -> String {
    if let Some(guard_err) = error.downcast_ref::<GuardError>() {
        return format_guard_error(guard_err);
    }
    if let Some(config_err) = error.downcast_ref::<ConfigError>() {
        return format_config_error(config_err);
    }
    if let Some(password_err) = error.downcast_ref::<PasswordError>() {
        return format_password_error(password_err);
    }
    format!("{error:#}")
}

fn format_guard_error(err: &GuardError) -> String {
    let hint = match err {
        GuardError::PathTraversal => "The path must stay inside the trusted root.",
        GuardError::MalformedTarget { .. } => {
            "Redirect targets must be absolute URLs such as https://example.com/home."
        }
        GuardError::UnsupportedScheme { .. } => "Only http and https targets are accepted.",
        GuardError::UntrustedHost { .. } => {
            "Add the host to `allowed_hosts` in your config, or pass --allow-host."
        }
        GuardError::ArityMismatch { .. } | GuardError::UnboundPlaceholder { .. } => {
            "Pass one argument per placeholder in the statement."
        }
        GuardError::Io(_) => "The confined path does not exist on disk.",
    };
    format!("{err} (rejected: {})\n\nTip: {hint}", err.kind())
}

fn format_config_error(err: &ConfigError) -> String {
    let location = config_file_path().map_or_else(
        || "your config file".to_string(),
        |path| path.display().to_string(),
    );
    match err {
        ConfigError::Load { .. } => {
            format!("{err}\n\nTip: Check your config file at {location}")
        }
        ConfigError::InvalidRoot { .. } => {
            format!("{err}\n\nTip: Set `root` to an existing directory in {location} or REQGUARD_ROOT.")
        }
        ConfigError::InvalidHost { .. } => format!(
            "{err}\n\nTip: Allowed hosts are bare hostnames like `example.com`, without scheme, port or path."
        ),
        ConfigError::WeakPasswordParams { .. } => format!(
            "{err}\n\nTip: Raise the values under [password] in {location}; the minimum is m=19456 KiB, t=2, p=1."
        ),
        ConfigError::SigningKey { .. } => format!(
            "{err}\n\nTip: Set `signing_key` in {location} or REQGUARD_SIGNING_KEY to at least 32 random bytes."
        ),
        ConfigError::HttpClient(_) => {
            format!("{err}\n\nTip: Check the [transport] section in {location}.")
        }
    }
}

fn format_password_error(err: &PasswordError) -> String {
    match err {
        PasswordError::MalformedHash => {
            format!("{err}\n\nTip: Pass the full PHC string, starting with `$argon2id$`.")
        }
        PasswordError::UnsupportedAlgorithm { .. } => format!(
            "{err}\n\nTip: Only argon2id hashes can be verified. Re-hash the password after the next successful login."
        ),
        PasswordError::Hash { .. } => err.to_string(),
    }
}
