// SPDX-License-Identifier: Apache-2.0

//! HMAC-SHA256 payload signatures.
//!
//! The key comes from configuration (`signing_key`, or `REQGUARD_SIGNING_KEY`
//! in the environment). There is no built-in fallback key: a deployment that
//! has not configured one cannot verify anything.
//!
//! # Examples
//!
//! ```
//! use reqguard_core::SigningKey;
//! use secrecy::SecretString;
//!
//! let key = SigningKey::new(SecretString::from("k".repeat(32)))?;
//! let sig = key.sign(b"order=42");
//! assert!(key.verify(b"order=42", &sig));
//! assert!(!key.verify(b"order=43", &sig));
//! # Ok::<(), reqguard_core::ConfigError>(())
//! ```

use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::debug;

use crate::config::GuardConfig;
use crate::error::ConfigError;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted key, in bytes.
pub const MIN_KEY_BYTES: usize = 32;

/// Keyed HMAC state for signing and verifying payloads.
///
/// The raw key is not kept; only the keyed MAC state, which is cloned per
/// operation.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    /// Keys the MAC with a configured secret.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SigningKey`] when the key is shorter than
    /// [`MIN_KEY_BYTES`].
    pub fn new(key: SecretString) -> Result<Self, ConfigError> {
        let bytes = key.expose_secret().as_bytes();
        if bytes.len() < MIN_KEY_BYTES {
            return Err(ConfigError::SigningKey {
                reason: format!(
                    "key is {} bytes, at least {MIN_KEY_BYTES} required",
                    bytes.len()
                ),
            });
        }
        let mac = <HmacSha256 as KeyInit>::new_from_slice(bytes).map_err(|e| {
            ConfigError::SigningKey {
                reason: e.to_string(),
            }
        })?;
        Ok(Self { mac })
    }

    /// Reads the key from configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SigningKey`] when no key is configured or it is too
    /// short.
    pub fn from_config(config: &GuardConfig) -> Result<Self, ConfigError> {
        let key = config
            .signing_key
            .clone()
            .ok_or_else(|| ConfigError::SigningKey {
                reason: "no signing key configured".to_string(),
            })?;
        Self::new(key)
    }

    /// Signs `payload`, returning the tag as lower-case hex.
    #[must_use]
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks a hex-encoded tag against `payload` in constant time.
    ///
    /// Malformed hex and tags of the wrong length are a mismatch.
    #[must_use]
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        let Ok(tag) = hex::decode(signature.trim()) else {
            debug!(kind = "bad_signature", "Signature is not valid hex");
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(payload);
        let ok = mac.verify_slice(&tag).is_ok();
        if !ok {
            debug!(kind = "bad_signature", "Signature mismatch");
        }
        ok
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}
