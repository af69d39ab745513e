//! Reconcile service for team membership management

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::directory::DirectoryClient;
use crate::domain::membership::{diff, MembershipChange, MembershipSet, SetOrigin};
use crate::domain::reconcile::{current_membership, reconcile, ReconcileError, ReconcileReport};
use crate::domain::team::TeamId;

/// Service-wide reconciliation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileSettings {
    /// Create directory users that do not exist yet
    pub create_users: bool,
    /// Login excluded when reading a team's current members
    pub ignored_login: Option<String>,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            create_users: true,
            ignored_login: Some("admin".to_string()),
        }
    }
}

/// Where the previous membership comes from
#[derive(Debug, Clone, PartialEq)]
pub enum PreviousState {
    /// Last applied membership, as recorded by the caller
    Keys(Vec<String>),
    /// Read the team's current members from the directory
    Remote,
}

/// Request for reconciling one team
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub team: TeamId,
    pub previous: PreviousState,
    pub desired: Vec<String>,
    /// Overrides `ReconcileSettings::create_users` for this request
    pub create_users: Option<bool>,
}

/// Changes a reconciliation would make
#[derive(Debug, Clone, Serialize)]
pub struct MembershipPlan {
    pub team: TeamId,
    pub changes: Vec<MembershipChange>,
}

impl MembershipPlan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Marks a team as being reconciled until dropped
struct InFlight<'a> {
    teams: &'a Mutex<HashSet<TeamId>>,
    team: TeamId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut teams = self.teams.lock().unwrap_or_else(|e| e.into_inner());
        teams.remove(&self.team);
    }
}

/// Reconcile service wiring a directory client into the reconcile pipeline.
///
/// At most one reconciliation per team runs at a time through a given service;
/// different teams proceed independently.
#[derive(Debug)]
pub struct ReconcileService<C: DirectoryClient> {
    client: Arc<C>,
    settings: ReconcileSettings,
    in_flight: Mutex<HashSet<TeamId>>,
}

impl<C: DirectoryClient> ReconcileService<C> {
    /// Create a new reconcile service
    pub fn new(client: Arc<C>, settings: ReconcileSettings) -> Self {
        Self {
            client,
            settings,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Compute the changes for a request without touching team membership
    pub async fn plan(
        &self,
        request: &ReconcileRequest,
    ) -> Result<MembershipPlan, ReconcileError> {
        let (previous, desired) = self.build_sets(request).await?;

        Ok(MembershipPlan {
            team: request.team,
            changes: diff(&previous, &desired),
        })
    }

    /// Reconcile a team's membership
    pub async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileReport, ReconcileError> {
        let _guard = self.acquire(request.team)?;
        let allow_create = request.create_users.unwrap_or(self.settings.create_users);

        info!(team = %request.team, allow_create, "Reconciling team membership");

        let (previous, desired) = self.build_sets(request).await?;
        reconcile(request.team, &previous, &desired, allow_create, self.client.as_ref()).await
    }

    async fn build_sets(
        &self,
        request: &ReconcileRequest,
    ) -> Result<(MembershipSet, MembershipSet), ReconcileError> {
        let desired = MembershipSet::from_keys(SetOrigin::Desired, &request.desired)?;

        let previous = match &request.previous {
            PreviousState::Keys(keys) => MembershipSet::from_keys(SetOrigin::Previous, keys)?,
            PreviousState::Remote => {
                debug!(team = %request.team, "Reading current team members");
                current_membership(
                    self.client.as_ref(),
                    request.team,
                    self.settings.ignored_login.as_deref(),
                )
                .await?
            }
        };

        Ok((previous, desired))
    }

    fn acquire(&self, team: TeamId) -> Result<InFlight<'_>, ReconcileError> {
        let mut teams = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());

        if !teams.insert(team) {
            return Err(ReconcileError::Busy { team });
        }

        Ok(InFlight {
            teams: &self.in_flight,
            team,
        })
    }
}
