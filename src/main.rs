use clap::Parser;
use team_membership_sync::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Command::Plan(args) => cli::plan::run(config, args).await,
        Command::Apply(args) => cli::apply::run(config, args).await,
    }
}
