// SPDX-License-Identifier: Apache-2.0

//! Error types for reqguard.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Per-request rejections ([`GuardError`]) are kept apart from startup
//! failures ([`ConfigError`]): the former are mapped to a 4xx response,
//! the latter abort process initialization.

use std::path::PathBuf;

use thiserror::Error;

/// Rejection of a single untrusted input by one of the guards.
///
/// Every variant is terminal for the request that produced it. The
/// `Display` output carries detail meant for logs; use
/// [`GuardError::public_message`] for anything sent back to a client.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Requested path escapes the trusted root.
    #[error("requested path escapes the trusted root")]
    PathTraversal,

    /// Redirect or fetch target could not be parsed as an absolute URL.
    #[error("malformed target: {reason}")]
    MalformedTarget {
        /// Parser message or the structural defect found.
        reason: String,
    },

    /// Target scheme is not http or https.
    #[error("unsupported scheme `{scheme}`")]
    UnsupportedScheme {
        /// The scheme as parsed.
        scheme: String,
    },

    /// Target host is not in the allowed host set.
    #[error("untrusted host `{host}`")]
    UntrustedHost {
        /// The host as parsed, lower-cased.
        host: String,
    },

    /// Placeholder count does not match the number of supplied values.
    #[error("statement expects {expected} parameter(s), got {actual}")]
    ArityMismatch {
        /// Placeholders in the template.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },

    /// A placeholder has no value of a matching style or name.
    #[error("no value bound for placeholder `{placeholder}`")]
    UnboundPlaceholder {
        /// Placeholder as written in the template (`?1`, `:name`).
        placeholder: String,
    },

    /// Confined path could not be resolved on disk.
    #[error("cannot resolve confined path: {0}")]
    Io(#[from] std::io::Error),
}

impl GuardError {
    /// HTTP status code a request handler should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            GuardError::Io(_) => 404,
            _ => 400,
        }
    }

    /// Client-safe message that never includes paths, hosts or SQL.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            GuardError::PathTraversal => "invalid path",
            GuardError::MalformedTarget { .. }
            | GuardError::UnsupportedScheme { .. }
            | GuardError::UntrustedHost { .. } => "bad redirect",
            GuardError::ArityMismatch { .. } | GuardError::UnboundPlaceholder { .. } => {
                "invalid query parameters"
            }
            GuardError::Io(_) => "not found",
        }
    }

    /// Short stable identifier, used as a structured logging field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GuardError::PathTraversal => "path_traversal",
            GuardError::MalformedTarget { .. } => "malformed_target",
            GuardError::UnsupportedScheme { .. } => "unsupported_scheme",
            GuardError::UntrustedHost { .. } => "untrusted_host",
            GuardError::ArityMismatch { .. } => "arity_mismatch",
            GuardError::UnboundPlaceholder { .. } => "unbound_placeholder",
            GuardError::Io(_) => "io",
        }
    }
}

/// Startup-fatal configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration sources could not be read or deserialized.
    #[error("Configuration error: {message}")]
    Load {
        /// Error message.
        message: String,
    },

    /// Trusted root is missing, relative, or not a directory.
    #[error("Invalid trusted root {}: {reason}", path.display())]
    InvalidRoot {
        /// Root as configured.
        path: PathBuf,
        /// Why it was refused.
        reason: String,
    },

    /// An allowed host entry is not a bare hostname.
    #[error("Invalid allowed host `{host}`")]
    InvalidHost {
        /// Entry as configured.
        host: String,
    },

    /// Password hashing parameters are below the accepted floor.
    #[error("Password hashing parameters too weak: {reason}")]
    WeakPasswordParams {
        /// Which parameter fell short.
        reason: String,
    },

    /// Payload signing key is missing or too short.
    #[error("Invalid signing key: {reason}")]
    SigningKey {
        /// Why it was refused.
        reason: String,
    },

    /// HTTP client could not be built from the transport settings.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load {
            message: err.to_string(),
        }
    }
}

/// Errors from the password hashing capability.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Hashing failed inside the algorithm implementation.
    #[error("Password hashing failed: {message}")]
    Hash {
        /// Error message.
        message: String,
    },

    /// Stored hash is not a valid PHC string.
    #[error("Stored password hash is malformed")]
    MalformedHash,

    /// Stored hash was produced by an algorithm this hasher refuses.
    #[error("Stored password hash uses unsupported algorithm `{algorithm}`")]
    UnsupportedAlgorithm {
        /// Algorithm identifier from the PHC string.
        algorithm: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_message_hides_detail() {
        let err = GuardError::UntrustedHost {
            host: "evil.example.com".to_string(),
        };
        assert!(err.to_string().contains("evil.example.com"));
        assert!(!err.public_message().contains("evil"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_io_maps_to_not_found() {
        let err = GuardError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_arity_message() {
        let err = GuardError::ArityMismatch {
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "statement expects 2 parameter(s), got 1");
        assert_eq!(err.public_message(), "invalid query parameters");
    }
}
