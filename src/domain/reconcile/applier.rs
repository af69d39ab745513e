//! Application of resolved membership changes

use serde::Serialize;
use tracing::{debug, info};

use super::error::ReconcileError;
use crate::domain::directory::MembershipWriter;
use crate::domain::membership::{Member, MembershipChange};
use crate::domain::team::TeamId;

/// What an apply pass did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyOutcome {
    pub added: Vec<Member>,
    pub removed: Vec<Member>,
    /// Changes the remote reported as already in place
    pub conflicts: Vec<MembershipChange>,
}

impl ApplyOutcome {
    pub fn applied(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Apply changes to a team in the order given.
///
/// Conflict responses count as success. Any other failure stops the pass and
/// is returned; changes already applied are not rolled back.
pub async fn apply<W>(
    team: TeamId,
    changes: &[MembershipChange],
    writer: &W,
) -> Result<ApplyOutcome, ReconcileError>
where
    W: MembershipWriter + ?Sized,
{
    if let Some(change) = changes.iter().find(|c| !c.member.is_resolved()) {
        return Err(ReconcileError::UnresolvedMember {
            key: change.key().to_string(),
        });
    }

    let mut outcome = ApplyOutcome::default();

    for change in changes {
        let user = change.member.id;

        let result = if change.kind.is_additive() {
            writer.add_member(team, user).await
        } else {
            writer.remove_member(team, user).await
        };

        match result {
            Ok(()) => {
                info!(
                    team = %team,
                    user = %user,
                    key = %change.key(),
                    operation = %change.kind,
                    "Applied membership change"
                );

                if change.kind.is_additive() {
                    outcome.added.push(change.member.clone());
                } else {
                    outcome.removed.push(change.member.clone());
                }
            }
            Err(e) if e.is_conflict() => {
                debug!(
                    team = %team,
                    user = %user,
                    operation = %change.kind,
                    "Membership already in requested state"
                );
                outcome.conflicts.push(change.clone());
            }
            Err(source) => {
                return Err(ReconcileError::Apply {
                    team,
                    user,
                    key: change.key().to_string(),
                    operation: change.kind,
                    source,
                });
            }
        }
    }

    Ok(outcome)
}
