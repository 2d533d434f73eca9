//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for password hashing operations
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2-based password hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new Argon2 hasher
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        // Unusable markers and legacy formats fail to parse and never verify
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::UNUSABLE_PASSWORD_PREFIX;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("P@55w0rd").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("P@55w0rd", &hash));
        assert!(!hasher.verify("p@55w0rd", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = Argon2Hasher::new();

        let hash1 = hasher.hash("P@55w0rd").unwrap();
        let hash2 = hasher.hash("P@55w0rd").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("P@55w0rd", &hash1));
        assert!(hasher.verify("P@55w0rd", &hash2));
    }

    #[test]
    fn test_unusable_hash_never_verifies() {
        let hasher = Argon2Hasher::new();
        let unusable = format!("{}abcdef", UNUSABLE_PASSWORD_PREFIX);

        assert!(!hasher.verify("", &unusable));
        assert!(!hasher.verify("P@55w0rd", ""));
        assert!(!hasher.verify("P@55w0rd", "plaintext"));
    }
}
