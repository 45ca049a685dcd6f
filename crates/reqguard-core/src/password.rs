// SPDX-License-Identifier: Apache-2.0

//! Password hashing as a pluggable capability.
//!
//! Callers depend on the [`PasswordHasher`] trait; [`Argon2Hasher`] is the
//! production implementation (argon2id, random salt per hash, PHC string
//! output). Its constructor refuses cost parameters below the floor set by
//! [`MIN_MEMORY_KIB`], [`MIN_ITERATIONS`] and [`MIN_PARALLELISM`], so a
//! configuration change cannot quietly turn it into a fast hash.
//!
//! [`fingerprint`] is a fast SHA-256 digest for content identity (cache
//! keys, `ETag`s). It is not a password hash and must not be used as one.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::OsRng;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::config::PasswordConfig;
use crate::error::{ConfigError, PasswordError};

/// Lowest accepted argon2 memory cost, in KiB.
pub const MIN_MEMORY_KIB: u32 = 19_456;

/// Lowest accepted argon2 iteration count.
pub const MIN_ITERATIONS: u32 = 2;

/// Lowest accepted argon2 lane count.
pub const MIN_PARALLELISM: u32 = 1;

/// PHC identifier of the only algorithm [`Argon2Hasher`] accepts.
const ARGON2ID: &str = "argon2id";

/// Slow, salted password hashing.
pub trait PasswordHasher: Send + Sync {
    /// PHC algorithm identifier produced by [`PasswordHasher::hash`].
    fn algorithm(&self) -> &'static str;

    /// Hashes `password` with a fresh salt, returning a PHC string.
    fn hash(&self, password: &SecretString) -> Result<String, PasswordError>;

    /// Checks `password` against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for malformed or
    /// foreign hashes.
    fn verify(&self, password: &SecretString, stored: &str) -> Result<bool, PasswordError>;
}

/// argon2id hasher with configured cost parameters.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Builds a hasher from configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::WeakPasswordParams`] if any cost is under its floor or
    /// argon2 rejects the combination.
    pub fn new(config: &PasswordConfig) -> Result<Self, ConfigError> {
        let weak = |reason: String| ConfigError::WeakPasswordParams { reason };

        if config.memory_kib < MIN_MEMORY_KIB {
            return Err(weak(format!(
                "memory_kib {} is below {MIN_MEMORY_KIB}",
                config.memory_kib
            )));
        }
        if config.iterations < MIN_ITERATIONS {
            return Err(weak(format!(
                "iterations {} is below {MIN_ITERATIONS}",
                config.iterations
            )));
        }
        if config.parallelism < MIN_PARALLELISM {
            return Err(weak(format!(
                "parallelism {} is below {MIN_PARALLELISM}",
                config.parallelism
            )));
        }

        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| weak(e.to_string()))?;

        Ok(Self { params })
    }

    /// True if `stored` was hashed with different cost parameters than this
    /// hasher's, meaning it should be re-hashed on the next successful login.
    pub fn needs_rehash(&self, stored: &str) -> Result<bool, PasswordError> {
        let parsed = parse_argon2id(stored)?;
        let embedded = Params::try_from(&parsed).map_err(|_| PasswordError::MalformedHash)?;
        Ok(embedded.m_cost() != self.params.m_cost()
            || embedded.t_cost() != self.params.t_cost()
            || embedded.p_cost() != self.params.p_cost())
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn algorithm(&self) -> &'static str {
        ARGON2ID
    }

    #[instrument(level = "debug", skip_all)]
    fn hash(&self, password: &SecretString) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .engine()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash {
                message: e.to_string(),
            })?;
        Ok(hash.to_string())
    }

    #[instrument(level = "debug", skip_all)]
    fn verify(&self, password: &SecretString, stored: &str) -> Result<bool, PasswordError> {
        let parsed = parse_argon2id(stored)?;
        match self
            .engine()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password mismatch");
                Ok(false)
            }
            Err(e) => Err(PasswordError::Hash {
                message: e.to_string(),
            }),
        }
    }
}

fn parse_argon2id(stored: &str) -> Result<PasswordHash<'_>, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;
    if parsed.algorithm.as_str() != ARGON2ID {
        return Err(PasswordError::UnsupportedAlgorithm {
            algorithm: parsed.algorithm.as_str().to_string(),
        });
    }
    Ok(parsed)
}

/// SHA-256 of `data`, lower-case hex.
///
/// Fast and unsalted: suitable for content identity, never for passwords.
#[must_use]
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
