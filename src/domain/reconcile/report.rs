//! Reconciliation report

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::applier::ApplyOutcome;
use crate::domain::team::{DirectoryUser, TeamId};

/// Summary of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub team: TeamId,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Keys whose change the remote reported as already applied
    pub conflicts: Vec<String>,
    pub created_users: Vec<DirectoryUser>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ReconcileReport {
    /// Report for a run that found nothing to change
    pub fn unchanged(team: TeamId, started_at: DateTime<Utc>) -> Self {
        Self {
            team,
            added: Vec::new(),
            removed: Vec::new(),
            conflicts: Vec::new(),
            created_users: Vec::new(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn from_outcome(
        team: TeamId,
        outcome: ApplyOutcome,
        created_users: Vec<DirectoryUser>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            team,
            added: outcome.added.into_iter().map(|m| m.key).collect(),
            removed: outcome.removed.into_iter().map(|m| m.key).collect(),
            conflicts: outcome.conflicts.into_iter().map(|c| c.member.key).collect(),
            created_users,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Whether the run left the remote untouched
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.created_users.is_empty()
    }
}
