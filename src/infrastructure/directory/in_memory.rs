//! In-memory directory implementation

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::directory::{
    DirectoryError, MembershipReader, MembershipWriter, UserDirectory, UserProvisioner,
};
use crate::domain::team::{DirectoryUser, TeamId, TeamMember, UserId};

/// A call received by the in-memory directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirectoryCall {
    ListUsers,
    CreateUser(String),
    AddMember(TeamId, UserId),
    RemoveMember(TeamId, UserId),
    ListMembers(TeamId),
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: BTreeMap<UserId, DirectoryUser>,
    teams: HashMap<TeamId, BTreeSet<UserId>>,
    next_id: i64,
    calls: Vec<DirectoryCall>,
    failures: HashMap<DirectoryCall, DirectoryError>,
}

impl DirectoryState {
    fn user_by_email(&self, email: &str) -> Option<&DirectoryUser> {
        self.users.values().find(|u| u.email == email)
    }

    fn record(&mut self, call: DirectoryCall) -> Result<(), DirectoryError> {
        self.calls.push(call.clone());

        match self.failures.remove(&call) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Thread-safe in-memory directory
///
/// Mirrors the remote conflict semantics (adding an existing member, removing
/// an absent one) and journals every call. Useful for testing and offline
/// planning. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    /// Creates an empty directory
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                next_id: 1,
                ..DirectoryState::default()
            }),
        }
    }

    /// Add a pre-existing user (builder pattern)
    pub fn with_user(self, id: i64, email: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.write() {
            let id = UserId::new(id);
            state.users.insert(id, DirectoryUser::new(id, email));
            state.next_id = state.next_id.max(id.get() + 1);
        }
        self
    }

    /// Set the id the next created user receives (builder pattern)
    pub fn with_next_id(self, next_id: i64) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.next_id = next_id;
        }
        self
    }

    /// Add a team with existing members (builder pattern)
    pub fn with_team(self, team: TeamId, members: &[i64]) -> Self {
        if let Ok(mut state) = self.state.write() {
            let members = members.iter().copied().map(UserId::new).collect();
            state.teams.insert(team, members);
        }
        self
    }

    /// Make the next matching call fail with `error`
    pub fn fail_on(&self, call: DirectoryCall, error: DirectoryError) {
        if let Ok(mut state) = self.state.write() {
            state.failures.insert(call, error);
        }
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.read().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Current member ids of a team
    pub fn members_of(&self, team: TeamId) -> Vec<UserId> {
        self.read()
            .ok()
            .and_then(|s| s.teams.get(&team).map(|m| m.iter().copied().collect()))
            .unwrap_or_default()
    }

    /// Look up a user by email
    pub fn find_user(&self, email: &str) -> Option<DirectoryUser> {
        self.read().ok()?.user_by_email(email).cloned()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, DirectoryState>, DirectoryError> {
        self.state
            .read()
            .map_err(|_| DirectoryError::transport("In-memory directory lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, DirectoryState>, DirectoryError> {
        self.state
            .write()
            .map_err(|_| DirectoryError::transport("In-memory directory lock poisoned"))
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
        let mut state = self.write()?;
        state.record(DirectoryCall::ListUsers)?;

        Ok(state.users.values().cloned().collect())
    }
}

#[async_trait]
impl UserProvisioner for InMemoryDirectory {
    async fn create_user(&self, email: &str) -> Result<UserId, DirectoryError> {
        let mut state = self.write()?;
        state.record(DirectoryCall::CreateUser(email.to_string()))?;

        if state.user_by_email(email).is_some() {
            return Err(DirectoryError::conflict(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        let id = UserId::new(state.next_id);
        state.next_id += 1;
        state
            .users
            .insert(id, DirectoryUser::new(id, email).with_login(email));

        Ok(id)
    }
}

#[async_trait]
impl MembershipWriter for InMemoryDirectory {
    async fn add_member(&self, team: TeamId, user: UserId) -> Result<(), DirectoryError> {
        let mut state = self.write()?;
        state.record(DirectoryCall::AddMember(team, user))?;

        if !state.users.contains_key(&user) {
            return Err(DirectoryError::not_found(format!("User {} not found", user)));
        }

        let members = state
            .teams
            .get_mut(&team)
            .ok_or_else(|| DirectoryError::not_found(format!("Team {} not found", team)))?;

        if !members.insert(user) {
            return Err(DirectoryError::conflict("User is already added to this team"));
        }

        Ok(())
    }

    async fn remove_member(&self, team: TeamId, user: UserId) -> Result<(), DirectoryError> {
        let mut state = self.write()?;
        state.record(DirectoryCall::RemoveMember(team, user))?;

        let members = state
            .teams
            .get_mut(&team)
            .ok_or_else(|| DirectoryError::not_found(format!("Team {} not found", team)))?;

        if !members.remove(&user) {
            return Err(DirectoryError::conflict("User is not a member of this team"));
        }

        Ok(())
    }
}

#[async_trait]
impl MembershipReader for InMemoryDirectory {
    async fn list_members(&self, team: TeamId) -> Result<Vec<TeamMember>, DirectoryError> {
        let mut state = self.write()?;
        state.record(DirectoryCall::ListMembers(team))?;

        let members = state
            .teams
            .get(&team)
            .ok_or_else(|| DirectoryError::not_found(format!("Team {} not found", team)))?;

        Ok(members
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(|u| {
                let login = u.login.clone().unwrap_or_else(|| u.email.clone());
                TeamMember::new(u.id, u.email.clone(), login)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directory::DirectoryErrorKind;

    fn team() -> TeamId {
        TeamId::new(1).unwrap()
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new()
            .with_user(100, "u1@x.com")
            .with_user(200, "u2@x.com")
            .with_team(team(), &[100])
    }

    #[tokio::test]
    async fn test_create_user_assigns_next_id() {
        let directory = directory();

        let id = directory.create_user("u3@x.com").await.unwrap();

        assert_eq!(id, UserId::new(201));
        assert_eq!(directory.find_user("u3@x.com").unwrap().id, id);
    }

    #[tokio::test]
    async fn test_create_existing_user_conflicts() {
        let error = directory().create_user("u1@x.com").await.unwrap_err();
        assert!(error.is_conflict());
    }

    #[tokio::test]
    async fn test_add_and_remove_conflicts() {
        let directory = directory();

        let error = directory.add_member(team(), UserId::new(100)).await.unwrap_err();
        assert!(error.is_conflict());

        let error = directory
            .remove_member(team(), UserId::new(200))
            .await
            .unwrap_err();
        assert!(error.is_conflict());

        directory.add_member(team(), UserId::new(200)).await.unwrap();
        directory.remove_member(team(), UserId::new(100)).await.unwrap();
        assert_eq!(directory.members_of(team()), vec![UserId::new(200)]);
    }

    #[tokio::test]
    async fn test_unknown_team_and_user() {
        let directory = directory();
        let other = TeamId::new(99).unwrap();

        let error = directory.add_member(other, UserId::new(100)).await.unwrap_err();
        assert_eq!(error.kind, DirectoryErrorKind::NotFound);

        let error = directory.add_member(team(), UserId::new(999)).await.unwrap_err();
        assert_eq!(error.kind, DirectoryErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_members_uses_login() {
        let directory = directory();
        directory.create_user("u3@x.com").await.unwrap();
        directory.add_member(team(), UserId::new(201)).await.unwrap();

        let members = directory.list_members(team()).await.unwrap();

        assert_eq!(
            members,
            vec![
                TeamMember::new(100, "u1@x.com", "u1@x.com"),
                TeamMember::new(201, "u3@x.com", "u3@x.com"),
            ]
        );
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let directory = directory();
        directory.fail_on(DirectoryCall::ListUsers, DirectoryError::remote(503, "down"));

        assert!(directory.list_users().await.is_err());
        assert_eq!(directory.list_users().await.unwrap().len(), 2);
        assert_eq!(
            directory.calls(),
            vec![DirectoryCall::ListUsers, DirectoryCall::ListUsers]
        );
    }
}
