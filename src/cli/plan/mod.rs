//! Plan command - shows membership changes without applying them

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use tracing::info;

use crate::config::TeamManifest;
use crate::domain::membership::{diff_keys, ChangeKind};
use crate::infrastructure::reconcile::MembershipPlan;

/// Arguments for the plan command
#[derive(Args, Clone)]
pub struct PlanArgs {
    /// Team manifest (TOML)
    pub manifest: PathBuf,

    /// Diff against the manifest's `previous` list without contacting the directory
    #[arg(long)]
    pub offline: bool,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the plan command
pub async fn run(config_path: Option<&Path>, args: PlanArgs) -> anyhow::Result<()> {
    let config = super::bootstrap(config_path)?;
    let manifest = TeamManifest::load(&args.manifest)?;

    let plan = if args.offline {
        offline_plan(&manifest)?
    } else {
        let service = super::create_service(&config)?;
        service
            .plan(&manifest.to_request(false))
            .await
            .with_context(|| format!("Failed to plan team {}", manifest.team_id))?
    };

    info!(team = %plan.team, changes = plan.changes.len(), "Plan computed");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_plan(&plan));
    }

    Ok(())
}

fn offline_plan(manifest: &TeamManifest) -> anyhow::Result<MembershipPlan> {
    let Some(previous) = &manifest.previous else {
        bail!("--offline requires a `previous` list in the manifest");
    };

    Ok(MembershipPlan {
        team: manifest.team_id,
        changes: diff_keys(previous, &manifest.users)?,
    })
}

fn render_plan(plan: &MembershipPlan) -> String {
    if plan.is_empty() {
        return format!("Team {}: no changes\n", plan.team);
    }

    let mut out = format!("Team {}: {} change(s)\n", plan.team, plan.changes.len());
    for change in &plan.changes {
        let sign = match change.kind {
            ChangeKind::Add | ChangeKind::Update => '+',
            ChangeKind::Remove => '-',
        };
        out.push_str(&format!("  {} {}\n", sign, change.key()));
    }

    out
}
