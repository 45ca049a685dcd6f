// SPDX-License-Identifier: Apache-2.0

//! Startup-validated guard state shared by request handlers.

use tracing::info;

use crate::config::GuardConfig;
use crate::error::{ConfigError, GuardError};
use crate::path::{ConfinedPath, TrustedRoot};
use crate::redirect::{AllowedHostSet, ValidatedRedirect};

/// Trusted root and allowed hosts, validated once and then read-only.
///
/// Cheap to clone and safe to share across threads; handlers receive it
/// instead of reading process-global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestGuards {
    root: TrustedRoot,
    allowed_hosts: AllowedHostSet,
}

impl RequestGuards {
    /// Bundles already-validated values.
    #[must_use]
    pub fn new(root: TrustedRoot, allowed_hosts: AllowedHostSet) -> Self {
        Self {
            root,
            allowed_hosts,
        }
    }

    /// Validates configuration: the root must be an existing directory and
    /// every allowed host a bare hostname.
    ///
    /// # Errors
    ///
    /// Any error here is startup-fatal.
    pub fn from_config(config: &GuardConfig) -> Result<Self, ConfigError> {
        let root = TrustedRoot::open(&config.root)?;
        let allowed_hosts = AllowedHostSet::new(&config.allowed_hosts)?;

        info!(
            root = %root,
            allowed_hosts = allowed_hosts.len(),
            "Request guards initialized"
        );

        Ok(Self::new(root, allowed_hosts))
    }

    /// The trusted root.
    #[must_use]
    pub fn root(&self) -> &TrustedRoot {
        &self.root
    }

    /// The allowed host set.
    #[must_use]
    pub fn allowed_hosts(&self) -> &AllowedHostSet {
        &self.allowed_hosts
    }

    /// Confines a requested path to the trusted root.
    pub fn confine(&self, requested: &str) -> Result<ConfinedPath, GuardError> {
        self.root.confine(requested)
    }

    /// Validates a redirect target against the allowed hosts.
    pub fn validate_redirect(&self, next: &str) -> Result<ValidatedRedirect, GuardError> {
        self.allowed_hosts.validate_redirect(next)
    }
}
