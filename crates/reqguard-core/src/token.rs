// SPDX-License-Identifier: Apache-2.0

//! Unpredictable session and CSRF tokens.

use std::fmt;

use rand_core::{OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// Bytes of OS randomness per token.
pub const TOKEN_BYTES: usize = 32;

/// Random token drawn from the operating system RNG, hex encoded.
///
/// The value is wrapped in [`SecretString`], so `Debug` output is redacted.
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Generates a fresh token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(SecretString::from(hex::encode(bytes)))
    }

    /// The encoded token, for setting a cookie or form field.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Compares a presented token in constant time.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        self.expose().as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let token = SessionToken::generate();
        assert_eq!(token.expose().len(), TOKEN_BYTES * 2);
        assert!(token.expose().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn test_matches() {
        let token = SessionToken::generate();
        let copy = token.expose().to_string();
        assert!(token.matches(&copy));
        assert!(!token.matches(""));
        assert!(!token.matches(&copy[1..]));
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::generate();
        assert!(!format!("{token:?}").contains(token.expose()));
    }

    #[test]
    fn test_matches_differs_in_last_byte() {
        let token = SessionToken::generate();
        let mut forged = token.expose().to_string();
        let last = forged.pop().unwrap();
        forged.push(if last == '0' { '1' } else { '0' });
        assert!(!token.matches(&forged));
    }
}
