//! Rejection of commonly used passwords

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::domain::account::AccountValidationError;
use crate::domain::DomainError;

/// Passwords rejected when no list file is configured
const BUILTIN_COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111",
    "1234567", "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein",
    "696969", "shadow", "master", "666666", "qwertyuiop", "123321", "mustang", "1234567890",
    "michael", "654321", "superman", "1qaz2wsx", "7777777", "121212", "000000", "qazwsx",
    "123qwe", "killer", "trustno1", "jordan", "jennifer", "zxcvbnm", "asdfgh", "hunter",
    "buster", "soccer", "harley", "batman", "andrew", "tigger", "sunshine", "iloveyou",
    "2000", "charlie", "robert", "thomas", "hockey", "ranger", "daniel", "starwars",
    "klaster", "112233", "george", "computer", "michelle", "jessica", "pepper", "1111",
    "zxcvbn", "555555", "11111111", "131313", "freedom", "777777", "pass", "maggie",
    "159753", "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda", "summer",
    "love", "ashley", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix", "password1",
    "password123", "welcome", "welcome1", "admin", "admin123", "administrator", "changeme",
    "passw0rd", "p@ssw0rd", "p@ssword", "qwerty123", "iloveyou1", "letmein1", "secret",
];

/// Validator that rejects passwords found in a list of common passwords
///
/// Entries and candidates are compared lowercased and trimmed.
#[derive(Debug, Clone)]
pub struct CommonPasswordValidator {
    passwords: HashSet<String>,
}

impl CommonPasswordValidator {
    /// Build a validator from any list of passwords
    pub fn with_passwords<I, S>(passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let passwords = passwords
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        Self { passwords }
    }

    /// Load a newline-separated list of passwords
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read common passwords list '{}': {}",
                path.display(),
                e
            ))
        })?;

        let validator = Self::with_passwords(contents.lines());
        debug!(path = %path.display(), entries = validator.len(), "Loaded common passwords list");

        Ok(validator)
    }

    /// Load from `path` when given, otherwise use the built-in list
    pub fn from_optional_file(path: Option<&str>) -> Result<Self, DomainError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject the password if it appears in the list
    pub fn validate(&self, password: &str) -> Result<(), AccountValidationError> {
        if self.passwords.contains(&password.trim().to_lowercase()) {
            return Err(AccountValidationError::CommonPassword);
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

impl Default for CommonPasswordValidator {
    fn default() -> Self {
        Self::with_passwords(BUILTIN_COMMON_PASSWORDS.iter().copied())
    }
}
