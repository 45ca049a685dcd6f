// SPDX-License-Identifier: Apache-2.0

//! Configuration management for reqguard.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `REQGUARD_`)
//! 2. Config file: `~/.config/reqguard/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Serve from a different root and allow two redirect hosts
//! REQGUARD_ROOT=/srv/files REQGUARD_ALLOWED_HOSTS=example.com,api.example.com reqguard config check
//!
//! # Key for payload signatures (never written back by `config show`)
//! REQGUARD_SIGNING_KEY="$(cat /run/secrets/signing-key)" reqguard sign < payload.json
//!
//! # Nested keys use a double underscore
//! REQGUARD_TRANSPORT__TIMEOUT_SECONDS=3 reqguard fetch https://api.example.com/meta
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::password::{MIN_ITERATIONS, MIN_MEMORY_KIB, MIN_PARALLELISM};

/// Process-wide guard configuration, read once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Directory files are served from.
    pub root: PathBuf,
    /// Directory uploaded files are written to.
    pub upload_dir: PathBuf,
    /// Hosts that redirect and fetch targets may point at.
    pub allowed_hosts: Vec<String>,
    /// Outbound HTTP settings.
    pub transport: TransportConfig,
    /// Password hashing cost.
    pub password: PasswordConfig,
    /// HMAC key for payload signatures. Never serialized back out.
    #[serde(skip_serializing)]
    pub signing_key: Option<SecretString>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/var/app/data"),
            upload_dir: PathBuf::from("/var/app/uploads"),
            allowed_hosts: vec!["example.com".to_string()],
            transport: TransportConfig::default(),
            password: PasswordConfig::default(),
            signing_key: None,
        }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Verify TLS certificates (default: true).
    pub verify_tls: bool,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Refuse plain-http requests.
    pub https_only: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            verify_tls: true,
            timeout_seconds: 10,
            https_only: false,
        }
    }
}

/// argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: MIN_MEMORY_KIB,
            iterations: MIN_ITERATIONS,
            parallelism: MIN_PARALLELISM,
        }
    }
}

/// Returns the reqguard configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/reqguard`. `None` if no home
/// directory can be determined.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return Some(PathBuf::from(xdg_config).join("reqguard"));
    }
    dirs::home_dir().map(|home| home.join(".config").join("reqguard"))
}

/// Returns the path to the default configuration file.
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Load configuration from the default file (if it exists) and environment.
///
/// Environment variables use the prefix `REQGUARD_` and double underscore
/// for nested keys (e.g., `REQGUARD_TRANSPORT__VERIFY_TLS`).
/// `REQGUARD_ALLOWED_HOSTS` is comma-separated.
///
/// # Errors
///
/// Returns `ConfigError::Load` if the config file exists but is invalid.
pub fn load_config() -> Result<GuardConfig, ConfigError> {
    let path = config_file_path();
    build(path.as_deref().map(|p| (p, false)))
}

/// Load configuration from an explicit file, which must exist.
///
/// Environment variables still take precedence over the file.
pub fn load_config_file(path: &Path) -> Result<GuardConfig, ConfigError> {
    build(Some((path, true)))
}

fn build(file: Option<(&Path, bool)>) -> Result<GuardConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some((path, required)) = file {
        builder = builder.add_source(File::from(path).required(required));
    }

    let config = builder
        .add_source(
            Environment::with_prefix("REQGUARD")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("allowed_hosts")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        // Without any config file or env vars, should return defaults
        let config = build(None).expect("should load with defaults");

        assert_eq!(config.root, PathBuf::from("/var/app/data"));
        assert_eq!(config.upload_dir, PathBuf::from("/var/app/uploads"));
        assert_eq!(config.allowed_hosts, vec!["example.com"]);
        assert!(config.signing_key.is_none());
        assert!(config.transport.verify_tls);
        assert_eq!(config.transport.timeout_seconds, 10);
        assert_eq!(config.password.memory_kib, 19_456);
    }

    #[test]
    #[serial]
    fn test_load_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
root = "/srv/files"
allowed_hosts = ["example.com", "api.example.com"]

[transport]
verify_tls = false
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).expect("should load file");
        assert_eq!(config.root, PathBuf::from("/srv/files"));
        assert_eq!(config.allowed_hosts, vec!["example.com", "api.example.com"]);
        assert!(!config.transport.verify_tls);
        assert_eq!(config.transport.timeout_seconds, 10);
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_error() {
        let err = load_config_file(Path::new("/no/such/reqguard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("REQGUARD_ALLOWED_HOSTS", "a.example.com,b.example.com");
            std::env::set_var("REQGUARD_TRANSPORT__TIMEOUT_SECONDS", "3");
        }

        let config = build(None);

        unsafe {
            std::env::remove_var("REQGUARD_ALLOWED_HOSTS");
            std::env::remove_var("REQGUARD_TRANSPORT__TIMEOUT_SECONDS");
        }

        let config = config.expect("should load from env");
        assert_eq!(config.allowed_hosts, vec!["a.example.com", "b.example.com"]);
        assert_eq!(config.transport.timeout_seconds, 3);
    }

    #[test]
    #[serial]
    fn test_signing_key_from_env_is_not_serialized() {
        use secrecy::ExposeSecret;

        unsafe {
            std::env::set_var("REQGUARD_SIGNING_KEY", "env-signing-key-with-enough-bytes!");
        }

        let config = build(None);

        unsafe {
            std::env::remove_var("REQGUARD_SIGNING_KEY");
        }

        let config = config.expect("should load from env");
        let key = config.signing_key.as_ref().expect("key should be set");
        assert_eq!(key.expose_secret(), "env-signing-key-with-enough-bytes!");

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("signing_key"));
        assert!(!json.contains("env-signing-key"));
        assert!(!format!("{config:?}").contains("env-signing-key"));
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let dir = config_dir();
        assert_eq!(dir, Some(PathBuf::from("/custom/config/reqguard")));
        assert!(config_file_path().unwrap().ends_with("config.toml"));

        // Cleanup
        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }
}
