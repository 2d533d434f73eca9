//! Application state for shared services

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::account::{Account, AccountRepository, ExtraFields};
use crate::domain::profile::{AccountProfile, ProfileDetails, ProfileRepository};
use crate::domain::DomainError;
use crate::infrastructure::account::{
    AccountManager, ChangePasswordRequest, PasswordHasher, RegisterRequest,
};
use crate::infrastructure::profile::ProfileService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub profile_service: Arc<dyn ProfileServiceTrait>,
}

/// Trait for account operations used by the HTTP and CLI layers
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError>;
    async fn list(&self, active: Option<bool>) -> Result<Vec<Account>, DomainError>;
    async fn count(&self, active: Option<bool>) -> Result<usize, DomainError>;
    async fn register(&self, request: RegisterRequest) -> Result<Account, DomainError>;
    async fn create_superuser(
        &self,
        username: &str,
        password: &str,
        extra: ExtraFields,
    ) -> Result<Account, DomainError>;
    async fn change_password(
        &self,
        username: &str,
        request: ChangePasswordRequest,
    ) -> Result<Account, DomainError>;
    async fn verify_age(
        &self,
        username: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Account, DomainError>;
    async fn delete(&self, username: &str) -> Result<bool, DomainError>;
}

/// Trait for profile operations
#[async_trait::async_trait]
pub trait ProfileServiceTrait: Send + Sync {
    async fn get(&self, username: &str) -> Result<Option<AccountProfile>, DomainError>;
    async fn get_public(&self, slug: &str) -> Result<Option<AccountProfile>, DomainError>;
    async fn list_public(&self) -> Result<Vec<AccountProfile>, DomainError>;
    async fn create(
        &self,
        username: &str,
        details: ProfileDetails,
    ) -> Result<AccountProfile, DomainError>;
    async fn update(
        &self,
        username: &str,
        details: ProfileDetails,
    ) -> Result<AccountProfile, DomainError>;
}

#[async_trait::async_trait]
impl<R: AccountRepository + 'static, H: PasswordHasher + 'static> AccountServiceTrait
    for AccountManager<R, H>
{
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
        AccountManager::get(self, username).await
    }

    async fn list(&self, active: Option<bool>) -> Result<Vec<Account>, DomainError> {
        AccountManager::list(self, active).await
    }

    async fn count(&self, active: Option<bool>) -> Result<usize, DomainError> {
        AccountManager::count(self, active).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<Account, DomainError> {
        AccountManager::register(self, request).await
    }

    async fn create_superuser(
        &self,
        username: &str,
        password: &str,
        extra: ExtraFields,
    ) -> Result<Account, DomainError> {
        AccountManager::create_superuser(self, username, password, extra).await
    }

    async fn change_password(
        &self,
        username: &str,
        request: ChangePasswordRequest,
    ) -> Result<Account, DomainError> {
        AccountManager::change_password(self, username, request).await
    }

    async fn verify_age(
        &self,
        username: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Account, DomainError> {
        AccountManager::verify_age(self, username, date_of_birth).await
    }

    async fn delete(&self, username: &str) -> Result<bool, DomainError> {
        AccountManager::delete(self, username).await
    }
}

#[async_trait::async_trait]
impl<P: ProfileRepository + 'static, A: AccountRepository + 'static> ProfileServiceTrait
    for ProfileService<P, A>
{
    async fn get(&self, username: &str) -> Result<Option<AccountProfile>, DomainError> {
        ProfileService::get(self, username).await
    }

    async fn get_public(&self, slug: &str) -> Result<Option<AccountProfile>, DomainError> {
        ProfileService::get_public(self, slug).await
    }

    async fn list_public(&self) -> Result<Vec<AccountProfile>, DomainError> {
        ProfileService::list_public(self).await
    }

    async fn create(
        &self,
        username: &str,
        details: ProfileDetails,
    ) -> Result<AccountProfile, DomainError> {
        ProfileService::create(self, username, details).await
    }

    async fn update(
        &self,
        username: &str,
        details: ProfileDetails,
    ) -> Result<AccountProfile, DomainError> {
        ProfileService::update(self, username, details).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        account_service: Arc<dyn AccountServiceTrait>,
        profile_service: Arc<dyn ProfileServiceTrait>,
    ) -> Self {
        Self {
            account_service,
            profile_service,
        }
    }
}
