// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Reqguard Core
//!
//! Guards that sit between untrusted request input and sensitive sinks.
//!
//! This crate provides reusable components for:
//! - Confining client-supplied paths to a trusted root directory
//! - Validating redirect and outbound targets against an allowed host set
//! - Binding query parameters to fixed statement templates
//! - Confining upload file names to the upload directory
//! - Password hashing, payload signatures, session tokens, and HTML escaping
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reqguard_core::{Params, RequestGuards, StatementTemplate, load_config};
//! use anyhow::Result;
//!
//! const USER_BY_NAME: StatementTemplate =
//!     StatementTemplate::new("SELECT id, name FROM users WHERE name = ?");
//!
//! # fn example(name: &str, file: &str, next: &str) -> Result<()> {
//! let config = load_config()?;
//! let guards = RequestGuards::from_config(&config)?;
//!
//! let path = guards.confine(file)?;
//! let redirect = guards.validate_redirect(next)?;
//! let stmt = USER_BY_NAME.bind(Params::positional([name]))?;
//!
//! println!("{} {} {}", path, redirect, stmt.sql());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`path`] - Path confinement
//! - [`redirect`] - Redirect target validation
//! - [`query`] - Parameter binding
//! - [`password`] - Password hashing
//! - [`signature`] - HMAC payload signatures
//! - [`transport`] - Outbound HTTP policy
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{ConfigError, GuardError, PasswordError};

/// Convenience Result type for guard checks.
///
/// This is equivalent to `std::result::Result<T, GuardError>`.
pub type Result<T> = std::result::Result<T, GuardError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    GuardConfig, PasswordConfig, TransportConfig, config_dir, config_file_path, load_config,
    load_config_file,
};
pub use guards::RequestGuards;

// ============================================================================
// Path Confinement
// ============================================================================

pub use path::{ConfinedPath, TrustedRoot, confine, confine_upload};

// ============================================================================
// Redirect Validation
// ============================================================================

pub use redirect::{AllowedHostSet, ValidatedRedirect, validate_redirect};

// ============================================================================
// Parameter Binding
// ============================================================================

pub use query::{BoundStatement, Executor, Params, Placeholder, SqlValue, StatementTemplate, bind};

// ============================================================================
// Credentials
// ============================================================================

pub use password::{Argon2Hasher, PasswordHasher, fingerprint};
pub use signature::SigningKey;
pub use token::SessionToken;

// ============================================================================
// Outbound HTTP
// ============================================================================

pub use transport::{build_http_client, check_outbound};

// ============================================================================
// Output Encoding
// ============================================================================

pub use escape::escape_html;

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod escape;
pub mod guards;
pub mod password;
pub mod path;
pub mod query;
pub mod redirect;
pub mod signature;
pub mod token;
pub mod transport;
