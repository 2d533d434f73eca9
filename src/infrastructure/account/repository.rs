//! In-memory account repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountRepository};
use crate::domain::DomainError;

/// In-memory implementation of AccountRepository
#[derive(Debug)]
pub struct InMemoryAccountRepository {
    /// Accounts keyed by username
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a repository with initial accounts
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let accounts_map = accounts
            .into_iter()
            .map(|account| (account.username().to_string(), account))
            .collect();

        Self {
            accounts: Arc::new(RwLock::new(accounts_map)),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        let username = account.username().to_string();

        if accounts.contains_key(&username) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                username
            )));
        }

        accounts.insert(username, account.clone());

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        match accounts.get(account.username()) {
            Some(existing) if existing.id() == account.id() => {}
            Some(_) => {
                return Err(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    account.username()
                )));
            }
            None => {
                return Err(DomainError::not_found(format!(
                    "Account '{}' not found",
                    account.username()
                )));
            }
        }

        accounts.insert(account.username().to_string(), account.clone());

        Ok(account.clone())
    }

    async fn delete(&self, username: &str) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.remove(username).is_some())
    }

    async fn list(&self, active: Option<bool>) -> Result<Vec<Account>, DomainError> {
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
        let accounts = self.accounts.read().await;

        let count = accounts
            .values()
            .filter(|a| active.is_none_or(|flag| a.is_active() == flag))
            .count();

        Ok(count)
    }

    async fn record_login(&self, username: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        if let Some(account) = accounts.get_mut(username) {
            account.record_login();
            Ok(())
        } else {
            Err(DomainError::not_found(format!(
                "Account '{}' not found",
                username
            )))
        }
    }
}
