use clap::Parser;
use sbxt_accounts::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Migrate => cli::migrate::run().await,
        Command::CreateSuperuser(args) => cli::create_superuser::run(args).await,
    }
}
