//! PostgreSQL account repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::account::{Account, AccountFlags, AccountId, AccountRepository};
use crate::domain::DomainError;

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, is_staff, is_superuser, is_active, \
is_of_age, date_joined, last_login";

/// PostgreSQL implementation of AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE username = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, password_hash, is_staff, is_superuser,
                                  is_active, is_of_age, date_joined, last_login)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.username())
        .bind(account.password_hash())
        .bind(account.is_staff())
        .bind(account.is_superuser())
        .bind(account.is_active())
        .bind(account.is_of_age())
        .bind(account.date_joined())
        .bind(account.last_login())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!(
                    "Username '{}' already exists",
                    account.username()
                ))
            } else {
                DomainError::storage(format!("Failed to create account: {}", e))
            }
        })?;

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET username = $2, password_hash = $3, is_staff = $4, is_superuser = $5,
                is_active = $6, is_of_age = $7, last_login = $8
            WHERE id = $1
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.username())
        .bind(account.password_hash())
        .bind(account.is_staff())
        .bind(account.is_superuser())
        .bind(account.is_active())
        .bind(account.is_of_age())
        .bind(account.last_login())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!(
                    "Username '{}' already exists",
                    account.username()
                ))
            } else {
                DomainError::storage(format!("Failed to update account: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                account.username()
            )));
        }

        Ok(account.clone())
    }

    async fn delete(&self, username: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM accounts WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete account: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, active: Option<bool>) -> Result<Vec<Account>, DomainError> {
        let rows = match active {
            Some(flag) => {
                sqlx::query(&format!(
                    "SELECT {} FROM accounts WHERE is_active = $1 ORDER BY date_joined, is_active",
                    ACCOUNT_COLUMNS
                ))
                .bind(flag)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM accounts ORDER BY date_joined, is_active",
                    ACCOUNT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list accounts: {}", e)))?;

        rows.iter().map(row_to_account).collect()
    }

    async fn count(&self, active: Option<bool>) -> Result<usize, DomainError> {
        let count: i64 = match active {
            Some(flag) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE is_active = $1")
                    .bind(flag)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to count accounts: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, username: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE accounts SET last_login = NOW() WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                username
            )));
        }

        Ok(())
    }
}

fn decode_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to decode account row: {}", e))
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(decode_error)?;
    let username: String = row.try_get("username").map_err(decode_error)?;
    let password_hash: String = row.try_get("password_hash").map_err(decode_error)?;

    let flags = AccountFlags {
        is_staff: row.try_get("is_staff").map_err(decode_error)?,
        is_superuser: row.try_get("is_superuser").map_err(decode_error)?,
        is_active: row.try_get("is_active").map_err(decode_error)?,
        is_of_age: row.try_get("is_of_age").map_err(decode_error)?,
    };

    Ok(Account::restore(
        AccountId::from_uuid(id),
        username,
        password_hash,
        flags,
        row.try_get("date_joined").map_err(decode_error)?,
        row.try_get("last_login").map_err(decode_error)?,
    ))
}
