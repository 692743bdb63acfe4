//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id using the library's default cost and a
//! fresh random salt per call. The resulting PHC string embeds the salt and
//! parameters, so verification needs nothing but the stored value.

use argon2::{
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier,
    password_hash::{self, SaltString},
};
use std::sync::OnceLock;

use crate::error::{AuthError, AuthResult};

/// Throwaway secret behind the hash that unknown-account logins verify against
const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// One-way salted password transform
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the default Argon2id parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password into a storable PHC string
    pub fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only an unparsable stored hash is an error.
    pub fn verify(&self, plaintext: &str, stored: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| AuthError::Hashing(format!("Failed to parse password hash: {}", e)))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(format!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }

    /// Verify against a fixed throwaway hash.
    ///
    /// Costs the same as [`verify`](Self::verify) on a real account, so a
    /// login for an unknown email takes as long as a wrong password.
    pub fn verify_dummy(&self, plaintext: &str) -> AuthResult<bool> {
        let stored = self.dummy_hash()?;
        self.verify(plaintext, stored)
    }

    fn dummy_hash(&self) -> AuthResult<&'static str> {
        if let Some(hash) = DUMMY_HASH.get() {
            return Ok(hash);
        }

        let hash = self.hash(DUMMY_PASSWORD)?;
        Ok(DUMMY_HASH.get_or_init(|| hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordHasher::new();
        let stored = hasher.hash("hunter22").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(hasher.verify("hunter22", &stored).unwrap());
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let hasher = PasswordHasher::new();
        let stored = hasher.hash("hunter22").unwrap();

        assert!(!hasher.verify("hunter23", &stored).unwrap());
        assert!(!hasher.verify("", &stored).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("correct horse").unwrap();
        let second = hasher.hash("correct horse").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("correct horse", &first).unwrap());
        assert!(hasher.verify("correct horse", &second).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_error() {
        let hasher = PasswordHasher::new();
        let err = hasher.verify("hunter22", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
    }

    #[test]
    fn test_dummy_verify_fails_with_real_hash_parameters() {
        let hasher = PasswordHasher::new();

        assert!(!hasher.verify_dummy("hunter22").unwrap());
        assert!(!hasher.verify_dummy("").unwrap());

        let dummy = hasher.dummy_hash().unwrap();
        let real = hasher.hash("hunter22").unwrap();
        let parameters = |phc: &str| phc.splitn(5, '$').take(4).collect::<Vec<_>>().join("$");
        assert_eq!(parameters(dummy), parameters(&real));

        // Computed once and reused
        assert_eq!(hasher.dummy_hash().unwrap(), dummy);
    }

    #[test]
    fn test_plaintext_never_appears_in_hash() {
        let hasher = PasswordHasher::new();
        let stored = hasher.hash("hunter22").unwrap();
        assert!(!stored.contains("hunter22"));
    }
}
