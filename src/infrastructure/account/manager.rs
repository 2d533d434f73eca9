//! Account manager: creation, authentication and lifecycle of accounts

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::account::{
    validate_age_now, validate_password, validate_username, Account, AccountFlags,
    AccountRepository, AccountValidationError, ExtraFields, DEFAULT_USER_AGE_LIMIT,
    MAX_USERNAME_LENGTH,
};
use crate::domain::profile::ProfileRepository;
use crate::domain::utils::normalize_username;
use crate::domain::DomainError;

use super::common_passwords::CommonPasswordValidator;
use super::password::PasswordHasher;

/// Request for the public signup flow
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub date_of_birth: NaiveDate,
}

/// Request for changing an account's password
#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

fn invalid(err: AccountValidationError) -> DomainError {
    DomainError::validation(err.to_string())
}

/// Manager for account creation and management
#[derive(Debug)]
pub struct AccountManager<R: AccountRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    common_passwords: CommonPasswordValidator,
    age_limit: u32,
    /// Deleted together with their account when set
    profiles: Option<Arc<dyn ProfileRepository>>,
}

impl<R: AccountRepository, H: PasswordHasher> AccountManager<R, H> {
    /// Create a new account manager
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            repository,
            hasher,
            common_passwords: CommonPasswordValidator::default(),
            age_limit: DEFAULT_USER_AGE_LIMIT,
            profiles: None,
        }
    }

    /// Use a different minimum age, in years
    pub fn with_age_limit(mut self, years: u32) -> Self {
        self.age_limit = years;
        self
    }

    /// Use a different common password list
    pub fn with_common_passwords(mut self, validator: CommonPasswordValidator) -> Self {
        self.common_passwords = validator;
        self
    }

    /// Cascade account deletion to the given profile repository
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileRepository>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn age_limit(&self) -> u32 {
        self.age_limit
    }

    /// Create a regular account
    ///
    /// Only checks that a username and password are present; the username
    /// pattern and password strength rules belong to [`Self::register`].
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        extra: ExtraFields,
    ) -> Result<Account, DomainError> {
        self.create_with_flags(username, password, extra.resolve(AccountFlags::default()))
            .await
    }

    /// Create a superuser
    ///
    /// `is_staff`, `is_superuser` and `is_active` default to true and may
    /// not be set to false.
    pub async fn create_superuser(
        &self,
        username: &str,
        password: &str,
        extra: ExtraFields,
    ) -> Result<Account, DomainError> {
        let required = [
            ("is_staff", extra.is_staff),
            ("is_superuser", extra.is_superuser),
            ("is_active", extra.is_active),
        ];

        for (field, value) in required {
            if value == Some(false) {
                return Err(invalid(AccountValidationError::SuperuserFlag(field)));
            }
        }

        let flags = extra.resolve(AccountFlags {
            is_staff: true,
            is_superuser: true,
            is_active: true,
            is_of_age: false,
        });

        let account = self.create_with_flags(username, password, flags).await?;
        info!(username = %account.username(), "Superuser created");

        Ok(account)
    }

    async fn create_with_flags(
        &self,
        username: &str,
        password: &str,
        flags: AccountFlags,
    ) -> Result<Account, DomainError> {
        if username.is_empty() {
            return Err(invalid(AccountValidationError::EmptyUsername));
        }

        if password.is_empty() {
            return Err(invalid(AccountValidationError::EmptyPassword));
        }

        let mut account = Account::new(username.to_lowercase(), "", flags);
        account.normalize();

        if account.username().is_empty() {
            return Err(invalid(AccountValidationError::EmptyUsername));
        }

        if account.username().chars().count() > MAX_USERNAME_LENGTH {
            return Err(invalid(AccountValidationError::UsernameTooLong(
                MAX_USERNAME_LENGTH,
            )));
        }

        if self.repository.username_exists(account.username()).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                account.username()
            )));
        }

        account.set_password_hash(self.hasher.hash(password)?);

        let account = self.repository.create(account).await?;
        debug!(username = %account.username(), is_staff = account.is_staff(), "Account created");

        Ok(account)
    }

    /// Sign up a new account with every validation rule applied
    pub async fn register(&self, request: RegisterRequest) -> Result<Account, DomainError> {
        let username = normalize_username(&request.username);

        validate_username(&username).map_err(invalid)?;
        self.validate_new_password(&request.password)?;
        validate_age_now(request.date_of_birth, self.age_limit).map_err(invalid)?;

        let flags = AccountFlags {
            is_of_age: true,
            ..AccountFlags::default()
        };

        let account = self
            .create_with_flags(&username, &request.password, flags)
            .await?;
        info!(username = %account.username(), "Account registered");

        Ok(account)
    }

    fn validate_new_password(&self, password: &str) -> Result<(), DomainError> {
        validate_password(password).map_err(invalid)?;
        self.common_passwords.validate(password).map_err(invalid)
    }

    /// Authenticate with username and password
    ///
    /// Returns `None` for unknown, inactive or password-less accounts and on
    /// a wrong password. Successful logins are recorded.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        let Some(account) = self.get(username).await? else {
            return Ok(None);
        };
        let username = account.username();

        if !account.is_active() || !account.has_usable_password() {
            debug!(username = %username, "Login refused for inactive or password-less account");
            return Ok(None);
        }

        if !self.hasher.verify(password, account.password_hash()) {
            warn!(username = %username, "Failed login attempt");
            return Ok(None);
        }

        self.repository.record_login(username).await?;

        self.repository.get(username).await
    }

    /// Check a raw password against the stored hash
    pub fn check_password(&self, account: &Account, password: &str) -> bool {
        account.has_usable_password() && self.hasher.verify(password, account.password_hash())
    }

    /// Get an account by username, in any case or spacing
    pub async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
        self.repository.get(&normalize_username(username)).await
    }

    async fn require(&self, username: &str) -> Result<Account, DomainError> {
        self.get(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", username)))
    }

    /// List accounts in default order
    pub async fn list(&self, active: Option<bool>) -> Result<Vec<Account>, DomainError> {
        self.repository.list(active).await
    }

    /// Count accounts
    pub async fn count(&self, active: Option<bool>) -> Result<usize, DomainError> {
        self.repository.count(active).await
    }

    /// The most recently joined account
    pub async fn latest(&self) -> Result<Option<Account>, DomainError> {
        let accounts = self.repository.list(None).await?;

        Ok(accounts.into_iter().max_by_key(|a| a.date_joined()))
    }

    /// Change a password after verifying the current one
    pub async fn change_password(
        &self,
        username: &str,
        request: ChangePasswordRequest,
    ) -> Result<Account, DomainError> {
        let mut account = self.require(username).await?;

        if !self.check_password(&account, &request.current_password) {
            return Err(DomainError::validation("Current password is incorrect"));
        }

        self.validate_new_password(&request.new_password)?;

        account.set_password_hash(self.hasher.hash(&request.new_password)?);
        let account = self.repository.update(&account).await?;
        info!(username = %account.username(), "Password changed");

        Ok(account)
    }

    /// Disable password login for an account
    pub async fn set_unusable_password(&self, username: &str) -> Result<Account, DomainError> {
        let mut account = self.require(username).await?;

        account.set_unusable_password();

        self.repository.update(&account).await
    }

    /// Check a date of birth against the age limit and mark the account of age
    pub async fn verify_age(
        &self,
        username: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Account, DomainError> {
        let mut account = self.require(username).await?;

        validate_age_now(date_of_birth, self.age_limit).map_err(invalid)?;

        account.set_of_age(true);

        self.repository.update(&account).await
    }

    /// Grant login access
    pub async fn activate(&self, username: &str) -> Result<Account, DomainError> {
        let mut account = self.require(username).await?;
        account.set_active(true);
        self.repository.update(&account).await
    }

    /// Revoke login access
    pub async fn deactivate(&self, username: &str) -> Result<Account, DomainError> {
        let mut account = self.require(username).await?;
        account.set_active(false);
        self.repository.update(&account).await
    }

    /// Delete an account, then its profile
    pub async fn delete(&self, username: &str) -> Result<bool, DomainError> {
        let username = normalize_username(username);

        if !self.repository.delete(&username).await? {
            return Ok(false);
        }

        if let Some(profiles) = &self.profiles {
            profiles.delete(&username).await?;
        }

        info!(username = %username, "Account deleted");

        Ok(true)
    }
}
