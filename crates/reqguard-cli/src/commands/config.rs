// SPDX-License-Identifier: Apache-2.0

//! Configuration inspection.

use std::path::Path;

use anyhow::Result;
use reqguard_core::{Argon2Hasher, GuardConfig, RequestGuards, SigningKey, build_http_client};

use super::types::{ConfigCheckResult, ConfigShowResult};

/// Runs every startup validation: root, hosts, password cost, HTTP client,
/// and the signing key when one is set.
pub fn run_check(config: &GuardConfig, config_file: Option<&Path>) -> Result<ConfigCheckResult> {
    let guards = RequestGuards::from_config(config)?;
    Argon2Hasher::new(&config.password)?;
    build_http_client(&config.transport)?;
    if config.signing_key.is_some() {
        SigningKey::from_config(config)?;
    }

    Ok(ConfigCheckResult {
        config_file: config_file.map(Path::to_path_buf),
        root: guards.root().as_path().to_path_buf(),
        allowed_hosts: guards.allowed_hosts().iter().map(str::to_string).collect(),
        verify_tls: config.transport.verify_tls,
        signing_key: config.signing_key.is_some(),
    })
}

/// Reports the effective configuration without validating it.
pub fn run_show(config: &GuardConfig, config_file: Option<&Path>) -> ConfigShowResult {
    ConfigShowResult {
        config_file: config_file.map(Path::to_path_buf),
        config: config.clone(),
    }
}
