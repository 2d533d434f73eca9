//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Account;
use crate::domain::DomainError;

/// Repository trait for account storage
///
/// Accounts are addressed by their normalized username, which is unique.
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by username
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Create a new account
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;

    /// Delete an account
    async fn delete(&self, username: &str) -> Result<bool, DomainError>;

    /// List accounts ordered by `date_joined`, then `is_active`
    async fn list(&self, active: Option<bool>) -> Result<Vec<Account>, DomainError>;

    /// Count accounts (optionally filtered by `is_active`)
    async fn count(&self, active: Option<bool>) -> Result<usize, DomainError>;

    /// Check if a username is taken
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get(username).await?.is_some())
    }

    /// Record a login for an account
    async fn record_login(&self, username: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock account repository for testing
    #[derive(Debug, Default)]
    pub struct MockAccountRepository {
        accounts: Arc<RwLock<HashMap<String, Account>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockAccountRepository {
        /// Create a new mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
            self.check_should_fail().await?;
            Ok(self.accounts.read().await.get(username).cloned())
        }

        async fn create(&self, account: Account) -> Result<Account, DomainError> {
            self.check_should_fail().await?;
            let mut accounts = self.accounts.write().await;

            if accounts.contains_key(account.username()) {
                return Err(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    account.username()
                )));
            }

            accounts.insert(account.username().to_string(), account.clone());
            Ok(account)
        }

        async fn update(&self, account: &Account) -> Result<Account, DomainError> {
            self.check_should_fail().await?;
            let mut accounts = self.accounts.write().await;

            if !accounts.contains_key(account.username()) {
                return Err(DomainError::not_found(format!(
                    "Account '{}' not found",
                    account.username()
                )));
            }

            accounts.insert(account.username().to_string(), account.clone());
            Ok(account.clone())
        }

        async fn delete(&self, username: &str) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            Ok(self.accounts.write().await.remove(username).is_some())
        }

        async fn list(&self, active: Option<bool>) -> Result<Vec<Account>, DomainError> {
            self.check_should_fail().await?;
            let accounts = self.accounts.read().await;

            let mut result: Vec<Account> = accounts
                .values()
                .filter(|a| active.is_none_or(|flag| a.is_active() == flag))
                .cloned()
                .collect();
            result.sort_by(Account::ordering);

            Ok(result)
        }

        async fn count(&self, active: Option<bool>) -> Result<usize, DomainError> {
            Ok(self.list(active).await?.len())
        }

        async fn record_login(&self, username: &str) -> Result<(), DomainError> {
            self.check_should_fail().await?;
            let mut accounts = self.accounts.write().await;

            match accounts.get_mut(username) {
                Some(account) => {
                    account.record_login();
                    Ok(())
                }
                None => Err(DomainError::not_found(format!(
                    "Account '{}' not found",
                    username
                ))),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::account::AccountFlags;

        fn create_test_account(username: &str) -> Account {
            Account::new(username, "hashed_password", AccountFlags::default())
        }

        #[tokio::test]
        async fn test_create_and_get() {
            let repo = MockAccountRepository::new();
            let account = create_test_account("normie");

            repo.create(account.clone()).await.unwrap();

            let retrieved = repo.get("normie").await.unwrap().unwrap();
            assert_eq!(retrieved.id(), account.id());
            assert!(repo.username_exists("normie").await.unwrap());
        }

        #[tokio::test]
        async fn test_should_fail() {
            let repo = MockAccountRepository::new();
            repo.set_should_fail(true).await;

            let result = repo.get("normie").await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }
    }
}
