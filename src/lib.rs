//! SBXT accounts
//!
//! User accounts and personal profiles for the SBXT site:
//! - Accounts keyed by a normalized username, with staff, superuser, active
//!   and of-age flags and Argon2 password hashes
//! - One profile per account holding name, contact details and visibility
//! - In-memory or PostgreSQL storage, an HTTP API and a management CLI

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use api::state::AppState;
use config::AccountsConfig;
use domain::{AccountRepository, ProfileRepository};
use infrastructure::account::{
    AccountManager, Argon2Hasher, CommonPasswordValidator, InMemoryAccountRepository,
    PostgresAccountRepository,
};
use infrastructure::profile::{
    InMemoryProfileRepository, PostgresProfileRepository, ProfileService,
};
use infrastructure::storage::{run_storage_migrations, StorageType};

/// Application name used in logs and the CLI
pub const APP_NAME: &str = "sbxt_accounts";

/// Short label of the accounts application
pub const APP_LABEL: &str = "accounts";

/// Create the application state for the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Storage backend: {}", config.storage.backend);

    match config.storage.backend {
        StorageType::Memory => create_in_memory_state(&config.accounts),
        StorageType::Postgres => {
            let pool = connect_postgres(config).await?;
            run_storage_migrations(&pool).await?;

            create_postgres_state(pool, &config.accounts)
        }
    }
}

/// Open the PostgreSQL pool described by the storage settings
pub async fn connect_postgres(config: &AppConfig) -> anyhow::Result<PgPool> {
    let postgres = config.storage.postgres().ok_or_else(|| {
        anyhow::anyhow!("A database URL is required (storage.database_url or DATABASE_URL)")
    })?;

    Ok(postgres.connect().await?)
}

/// State backed by in-memory repositories
pub fn create_in_memory_state(config: &AccountsConfig) -> anyhow::Result<AppState> {
    build_state(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(InMemoryProfileRepository::new()),
        config,
    )
}

/// State backed by PostgreSQL repositories sharing one pool
pub fn create_postgres_state(pool: PgPool, config: &AccountsConfig) -> anyhow::Result<AppState> {
    build_state(
        Arc::new(PostgresAccountRepository::new(pool.clone())),
        Arc::new(PostgresProfileRepository::new(pool)),
        config,
    )
}

fn build_state<R, P>(
    accounts: Arc<R>,
    profiles: Arc<P>,
    config: &AccountsConfig,
) -> anyhow::Result<AppState>
where
    R: AccountRepository + 'static,
    P: ProfileRepository + 'static,
{
    let common_passwords =
        CommonPasswordValidator::from_optional_file(config.common_passwords_list.as_deref())?;

    let account_manager = AccountManager::new(accounts.clone(), Arc::new(Argon2Hasher::new()))
        .with_age_limit(config.user_age_limit)
        .with_common_passwords(common_passwords)
        .with_profiles(profiles.clone());

    let profile_service = ProfileService::new(profiles, accounts);

    Ok(AppState::new(
        Arc::new(account_manager),
        Arc::new(profile_service),
    ))
}
