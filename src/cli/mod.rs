//! CLI module for SBXT accounts
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: create the PostgreSQL tables
//! - `create-superuser`: create an administrator account

pub mod create_superuser;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// SBXT accounts - user accounts and profiles
#[derive(Parser)]
#[command(name = "sbxt-accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply PostgreSQL migrations
    Migrate,

    /// Create a superuser account
    CreateSuperuser(create_superuser::CreateSuperuserArgs),
}

/// Load `.env` and the layered configuration, then install logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    Ok(config)
}
