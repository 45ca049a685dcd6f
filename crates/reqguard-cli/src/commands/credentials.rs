// SPDX-License-Identifier: Apache-2.0

//! Password hashing, payload signatures and session tokens.

use std::io::{BufRead, Read};

use anyhow::{Context, Result};
use reqguard_core::{Argon2Hasher, GuardConfig, PasswordHasher, SessionToken, SigningKey};
use secrecy::SecretString;

use super::types::{HashResult, SignResult, SignatureCheckResult, TokenResult, VerifyResult};

/// Reads one password line from stdin, without the line terminator.
fn read_password() -> Result<SecretString> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        anyhow::bail!("No password on stdin");
    }
    Ok(SecretString::from(trimmed.to_string()))
}

/// Hash a password from stdin with the configured argon2id parameters.
pub fn run_hash(config: &GuardConfig) -> Result<HashResult> {
    let hasher = Argon2Hasher::new(&config.password)?;
    let password = read_password()?;
    let hash = hasher.hash(&password)?;
    Ok(HashResult {
        algorithm: hasher.algorithm(),
        hash,
    })
}

/// Verify a password from stdin against a stored PHC string.
pub fn run_verify(stored: &str, config: &GuardConfig) -> Result<VerifyResult> {
    let hasher = Argon2Hasher::new(&config.password)?;
    let password = read_password()?;
    let matches = hasher.verify(&password, stored)?;
    let needs_rehash = matches && hasher.needs_rehash(stored)?;
    Ok(VerifyResult {
        matches,
        needs_rehash,
    })
}

/// Generate a fresh session token.
pub fn run_token() -> TokenResult {
    let token = SessionToken::generate();
    TokenResult {
        token: token.expose().to_string(),
    }
}

/// Reads the whole payload from stdin.
fn read_payload() -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut payload)
        .context("Failed to read payload from stdin")?;
    Ok(payload)
}

/// Sign the stdin payload with the configured key.
pub fn run_sign(config: &GuardConfig) -> Result<SignResult> {
    let key = SigningKey::from_config(config)?;
    let payload = read_payload()?;
    Ok(SignResult {
        algorithm: "hmac-sha256",
        signature: key.sign(&payload),
    })
}

/// Check a hex signature over the stdin payload.
pub fn run_verify_signature(signature: &str, config: &GuardConfig) -> Result<SignatureCheckResult> {
    let key = SigningKey::from_config(config)?;
    let payload = read_payload()?;
    Ok(SignatureCheckResult {
        valid: key.verify(&payload, signature),
    })
}
