//! Create-superuser command

use clap::Args;
use tracing::{info, warn};

use crate::domain::account::ExtraFields;
use crate::infrastructure::storage::StorageType;

#[derive(Debug, Args)]
pub struct CreateSuperuserArgs {
    /// Username of the new superuser
    #[arg(long)]
    pub username: String,

    /// Raw password; stored hashed
    #[arg(long, env = "SBXT_SUPERUSER_PASSWORD")]
    pub password: String,
}

/// Create a superuser in the configured storage
pub async fn run(args: CreateSuperuserArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    if config.storage.backend == StorageType::Memory {
        warn!("In-memory storage is configured; the account is discarded on exit");
    }

    let state = crate::create_app_state_with_config(&config).await?;

    let account = state
        .account_service
        .create_superuser(&args.username, &args.password, ExtraFields::default())
        .await?;

    info!(username = %account.username(), "Superuser created");
    println!("Superuser '{}' created", account.username());

    Ok(())
}
