//! PostgreSQL profile repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::profile::{AccountProfile, ProfileDetails, ProfileRepository};
use crate::domain::DomainError;
use crate::infrastructure::account::is_unique_violation;

const PROFILE_COLUMNS: &str = "account, slug, first_name, last_name, email, phone, is_public, \
description, profile_pic";

const EMAIL_CONSTRAINT: &str = "accounts_profiles_email_key";

/// PostgreSQL implementation of ProfileRepository
#[derive(Debug, Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<AccountProfile>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts_profiles WHERE {} = $1",
            PROFILE_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get profile: {}", e)))?;

        row.as_ref().map(row_to_profile).transpose()
    }
}

fn write_error(e: sqlx::Error, profile: &AccountProfile, action: &str) -> DomainError {
    if is_unique_violation(&e) {
        let on_email = matches!(
            &e,
            sqlx::Error::Database(db) if db.constraint() == Some(EMAIL_CONSTRAINT)
        );

        return if on_email {
            DomainError::conflict(format!("Email '{}' is already in use", profile.email()))
        } else {
            DomainError::conflict(format!(
                "Account '{}' already has a profile",
                profile.account()
            ))
        };
    }

    if matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation()) {
        return DomainError::not_found(format!("Account '{}' not found", profile.account()));
    }

    DomainError::storage(format!("Failed to {} profile: {}", action, e))
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn get(&self, account: &str) -> Result<Option<AccountProfile>, DomainError> {
        self.fetch_one_where("account", account).await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<AccountProfile>, DomainError> {
        self.fetch_one_where("slug", slug).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<AccountProfile>, DomainError> {
        self.fetch_one_where("email", email).await
    }

    async fn create(&self, profile: AccountProfile) -> Result<AccountProfile, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts_profiles (account, slug, first_name, last_name, email,
                                           phone, is_public, description, profile_pic)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(profile.account())
        .bind(profile.slug())
        .bind(profile.first_name())
        .bind(profile.last_name())
        .bind(profile.email())
        .bind(profile.phone())
        .bind(profile.is_public())
        .bind(profile.description())
        .bind(profile.profile_pic())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &profile, "create"))?;

        Ok(profile)
    }

    async fn update(&self, profile: &AccountProfile) -> Result<AccountProfile, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts_profiles
            SET slug = $2, first_name = $3, last_name = $4, email = $5, phone = $6,
                is_public = $7, description = $8, profile_pic = $9
            WHERE account = $1
            "#,
        )
        .bind(profile.account())
        .bind(profile.slug())
        .bind(profile.first_name())
        .bind(profile.last_name())
        .bind(profile.email())
        .bind(profile.phone())
        .bind(profile.is_public())
        .bind(profile.description())
        .bind(profile.profile_pic())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, profile, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Profile for account '{}' not found",
                profile.account()
            )));
        }

        Ok(profile.clone())
    }

    async fn delete(&self, account: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM accounts_profiles WHERE account = $1")
            .bind(account)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete profile: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, public_only: bool) -> Result<Vec<AccountProfile>, DomainError> {
        let filter = if public_only { "WHERE is_public" } else { "" };

        let rows = sqlx::query(&format!(
            "SELECT {} FROM accounts_profiles {} ORDER BY last_name, first_name",
            PROFILE_COLUMNS, filter
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list profiles: {}", e)))?;

        rows.iter().map(row_to_profile).collect()
    }
}

fn decode_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to decode profile row: {}", e))
}

fn row_to_profile(row: &PgRow) -> Result<AccountProfile, DomainError> {
    let details = ProfileDetails {
        first_name: row.try_get("first_name").map_err(decode_error)?,
        last_name: row.try_get("last_name").map_err(decode_error)?,
        email: row.try_get("email").map_err(decode_error)?,
        phone: row.try_get("phone").map_err(decode_error)?,
        description: row.try_get("description").map_err(decode_error)?,
        is_public: row.try_get("is_public").map_err(decode_error)?,
    };

    let account: String = row.try_get("account").map_err(decode_error)?;
    let slug: String = row.try_get("slug").map_err(decode_error)?;

    Ok(AccountProfile::restore(
        account,
        slug,
        details,
        row.try_get("profile_pic").map_err(decode_error)?,
    ))
}
