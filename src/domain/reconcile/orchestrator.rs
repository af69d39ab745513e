//! Reconcile-on-write orchestration

use chrono::Utc;
use tracing::{info, instrument};

use super::applier::apply;
use super::error::ReconcileError;
use super::report::ReconcileReport;
use super::resolver::{resolve, KnownUsers};
use crate::domain::directory::{DirectoryClient, MembershipReader};
use crate::domain::membership::{diff, MembershipSet, SetOrigin};
use crate::domain::team::TeamId;

/// Bring a team's remote membership from `previous` to `desired`.
///
/// Runs diff, resolve against a fresh directory snapshot, then apply, failing
/// at the first stage that errors. Concurrent calls for the same team must be
/// serialised by the caller.
#[instrument(skip_all, fields(team = %team))]
pub async fn reconcile<C>(
    team: TeamId,
    previous: &MembershipSet,
    desired: &MembershipSet,
    allow_create: bool,
    client: &C,
) -> Result<ReconcileReport, ReconcileError>
where
    C: DirectoryClient + ?Sized,
{
    let started_at = Utc::now();
    let changes = diff(previous, desired);

    if changes.is_empty() {
        info!("Team membership already up to date");
        return Ok(ReconcileReport::unchanged(team, started_at));
    }

    info!(changes = changes.len(), "Computed membership changes");

    let snapshot = client
        .list_users()
        .await
        .map_err(|source| ReconcileError::Snapshot { source })?;
    let known = KnownUsers::from_snapshot(snapshot);

    let resolution = resolve(changes, &known, allow_create, client).await?;
    let outcome = apply(team, &resolution.changes, client).await?;

    info!(
        added = outcome.added.len(),
        removed = outcome.removed.len(),
        conflicts = outcome.conflicts.len(),
        created = resolution.created.len(),
        "Reconciliation complete"
    );

    Ok(ReconcileReport::from_outcome(
        team,
        outcome,
        resolution.created,
        started_at,
    ))
}

/// Build the previous-state set from the team's remote member listing.
///
/// The member whose login equals `ignored_login` (the service account the
/// directory adds to every team it creates) is left out.
pub async fn current_membership<R>(
    reader: &R,
    team: TeamId,
    ignored_login: Option<&str>,
) -> Result<MembershipSet, ReconcileError>
where
    R: MembershipReader + ?Sized,
{
    let members = reader
        .list_members(team)
        .await
        .map_err(|source| ReconcileError::MemberListing { team, source })?;

    let emails = members
        .iter()
        .filter(|m| ignored_login != Some(m.login.as_str()))
        .map(|m| m.email.as_str());

    Ok(MembershipSet::from_keys(SetOrigin::Previous, emails)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directory::{DirectoryError, MockMembershipReader};
    use crate::domain::team::TeamMember;

    #[tokio::test]
    async fn test_current_membership_skips_ignored_login() {
        let mut reader = MockMembershipReader::new();
        reader.expect_list_members().times(1).returning(|_| {
            Ok(vec![
                TeamMember::new(1, "admin@localhost", "admin"),
                TeamMember::new(100, "u1@x.com", "u1"),
                TeamMember::new(200, "u2@x.com", "u2"),
            ])
        });

        let set = current_membership(&reader, TeamId::new(4).unwrap(), Some("admin"))
            .await
            .unwrap();

        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["u1@x.com", "u2@x.com"]);
    }

    #[tokio::test]
    async fn test_current_membership_without_ignored_login() {
        let mut reader = MockMembershipReader::new();
        reader
            .expect_list_members()
            .returning(|_| Ok(vec![TeamMember::new(1, "admin@localhost", "admin")]));

        let set = current_membership(&reader, TeamId::new(4).unwrap(), None)
            .await
            .unwrap();

        assert!(set.contains("admin@localhost"));
    }

    #[tokio::test]
    async fn test_current_membership_listing_failure() {
        let mut reader = MockMembershipReader::new();
        reader
            .expect_list_members()
            .returning(|_| Err(DirectoryError::not_found("Team not found")));

        let result = current_membership(&reader, TeamId::new(4).unwrap(), None).await;

        assert!(matches!(result, Err(ReconcileError::MemberListing { .. })));
    }
}
