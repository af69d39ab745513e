//! Apply command - reconciles a team against its manifest

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::config::TeamManifest;
use crate::domain::reconcile::ReconcileReport;

/// Arguments for the apply command
#[derive(Args, Clone)]
pub struct ApplyArgs {
    /// Team manifest (TOML)
    pub manifest: PathBuf,

    /// Read the previous membership from the directory even if the manifest records one
    #[arg(long)]
    pub from_remote: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the apply command
pub async fn run(config_path: Option<&Path>, args: ApplyArgs) -> anyhow::Result<()> {
    let config = super::bootstrap(config_path)?;
    let manifest = TeamManifest::load(&args.manifest)?;
    let service = super::create_service(&config)?;

    let report = service
        .reconcile(&manifest.to_request(args.from_remote))
        .await
        .with_context(|| format!("Failed to reconcile team {}", manifest.team_id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

fn render_report(report: &ReconcileReport) -> String {
    if report.is_noop() && report.conflicts.is_empty() {
        return format!("Team {}: already in sync\n", report.team);
    }

    let mut out = format!("Team {}:\n", report.team);
    for user in &report.created_users {
        out.push_str(&format!("  created {} (id {})\n", user.email, user.id));
    }
    for key in &report.added {
        out.push_str(&format!("  + {}\n", key));
    }
    for key in &report.removed {
        out.push_str(&format!("  - {}\n", key));
    }
    for key in &report.conflicts {
        out.push_str(&format!("  = {} (already applied)\n", key));
    }

    out
}
