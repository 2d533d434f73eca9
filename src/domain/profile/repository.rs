//! Profile repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::AccountProfile;
use crate::domain::DomainError;

/// Repository trait for profile storage
///
/// Profiles are keyed by the username of their owning account.
#[async_trait]
pub trait ProfileRepository: Send + Sync + Debug {
    /// Get the profile of an account
    async fn get(&self, account: &str) -> Result<Option<AccountProfile>, DomainError>;

    /// Get a profile by its slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<AccountProfile>, DomainError>;

    /// Get the profile using an email address
    async fn get_by_email(&self, email: &str) -> Result<Option<AccountProfile>, DomainError>;

    /// Create a new profile
    async fn create(&self, profile: AccountProfile) -> Result<AccountProfile, DomainError>;

    /// Update an existing profile
    async fn update(&self, profile: &AccountProfile) -> Result<AccountProfile, DomainError>;

    /// Delete the profile of an account
    async fn delete(&self, account: &str) -> Result<bool, DomainError>;

    /// List profiles ordered by `last_name`, then `first_name`
    async fn list(&self, public_only: bool) -> Result<Vec<AccountProfile>, DomainError>;
}
