//! CLI module for team membership sync
//!
//! Provides subcommands operating on a team manifest:
//! - `plan`: show the membership changes a sync would make
//! - `apply`: reconcile the team against the directory

pub mod apply;
pub mod plan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::directory::HttpDirectoryClient;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::reconcile::ReconcileService;

/// Team membership sync - keep directory teams in line with a manifest
#[derive(Parser)]
#[command(name = "team-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file layered over config/default and config/local
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the changes a sync would make
    Plan(plan::PlanArgs),

    /// Apply the manifest to the directory
    Apply(apply::ApplyArgs),
}

/// Load `.env`, configuration and logging.
fn bootstrap(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_path)?;
    init_logging(&config.logging);

    Ok(config)
}

fn create_service(config: &AppConfig) -> anyhow::Result<ReconcileService<HttpDirectoryClient>> {
    let client = HttpDirectoryClient::new(config.directory_client_config())?;

    Ok(ReconcileService::new(
        Arc::new(client),
        config.reconcile_settings(),
    ))
}
