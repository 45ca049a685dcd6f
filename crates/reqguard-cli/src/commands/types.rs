// SPDX-License-Identifier: Apache-2.0

//! Result types returned by command handlers.
//!
//! Handlers return data instead of printing directly; `output` renders it.

use std::path::PathBuf;

use reqguard_core::{BoundStatement, ConfinedPath, GuardConfig, ValidatedRedirect};
use serde::Serialize;

/// Result from the path command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PathResult {
    /// Trusted root the request was confined to.
    pub root: PathBuf,
    /// The confined path.
    pub confined: ConfinedPath,
    /// On-disk location after symlink resolution (with `--resolve`).
    pub resolved: Option<PathBuf>,
}

/// Result from the upload command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UploadResult {
    /// Upload directory the name was confined to.
    pub dir: PathBuf,
    /// Where the upload would be written.
    pub confined: ConfinedPath,
}

/// Result from the redirect command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RedirectResult {
    /// Re-serialized target, safe for a `Location` header.
    pub location: ValidatedRedirect,
    /// Host the target points at.
    pub host: String,
}

/// Result from the query command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueryResult {
    /// Built-in statement name.
    pub statement: String,
    /// Template SQL with typed bindings.
    pub bound: BoundStatement,
}

/// Result from the hash command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HashResult {
    /// PHC algorithm identifier.
    pub algorithm: &'static str,
    /// PHC string.
    pub hash: String,
}

/// Result from `hash --verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifyResult {
    /// Whether the password matched.
    pub matches: bool,
    /// Whether the stored hash uses outdated cost parameters.
    pub needs_rehash: bool,
}

/// Result from the token command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenResult {
    /// Hex-encoded token.
    pub token: String,
}

/// Result from the sign command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SignResult {
    /// MAC algorithm.
    pub algorithm: &'static str,
    /// Hex-encoded tag.
    pub signature: String,
}

/// Result from `sign --verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SignatureCheckResult {
    /// Whether the signature matched the payload.
    pub valid: bool,
}

/// Result from the fetch command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FetchResult {
    /// URL that was requested.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// `Location` header of a redirect response, not followed.
    pub location: Option<String>,
    /// Body size in bytes.
    pub bytes: usize,
    /// SHA-256 of the body.
    pub sha256: String,
}

/// Result from `config check`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigCheckResult {
    /// Config file that was read, if one exists.
    pub config_file: Option<PathBuf>,
    /// Canonical trusted root.
    pub root: PathBuf,
    /// Normalized allowed hosts.
    pub allowed_hosts: Vec<String>,
    /// Whether outbound TLS certificates are verified.
    pub verify_tls: bool,
    /// Whether a usable signing key is configured.
    pub signing_key: bool,
}

/// Result from `config show`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigShowResult {
    /// Config file that was read, if one exists.
    pub config_file: Option<PathBuf>,
    /// Effective configuration.
    pub config: GuardConfig,
}
