//! Account infrastructure module
//!
//! Password hashing with Argon2, the common password list, in-memory and
//! PostgreSQL repositories, and the account manager.

mod common_passwords;
mod manager;
mod password;
mod postgres_repository;
mod repository;

pub use common_passwords::CommonPasswordValidator;
pub use manager::{AccountManager, ChangePasswordRequest, RegisterRequest};
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresAccountRepository;
pub(crate) use postgres_repository::is_unique_violation;
pub use repository::InMemoryAccountRepository;

#[cfg(test)]
pub use password::MockPasswordHasher;
