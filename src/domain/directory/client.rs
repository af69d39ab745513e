//! Remote directory collaborator traits

use async_trait::async_trait;

use super::error::DirectoryError;
use crate::domain::team::{DirectoryUser, TeamId, TeamMember, UserId};

#[cfg(test)]
use mockall::automock;

/// Read access to the full user directory
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch every known user
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError>;
}

/// Provisioning of new remote identities.
///
/// Creating a user is irreversible from this crate's point of view; callers
/// must only reach it when user creation is explicitly allowed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserProvisioner: Send + Sync {
    /// Create a user for the given email and return its remote id
    async fn create_user(&self, email: &str) -> Result<UserId, DirectoryError>;
}

/// Mutations of a team's membership
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MembershipWriter: Send + Sync {
    /// Add a user to a team. Fails with a conflict kind if already a member.
    async fn add_member(&self, team: TeamId, user: UserId) -> Result<(), DirectoryError>;

    /// Remove a user from a team. Fails with a conflict kind if not a member.
    async fn remove_member(&self, team: TeamId, user: UserId) -> Result<(), DirectoryError>;
}

/// Read access to a team's current members
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MembershipReader: Send + Sync {
    async fn list_members(&self, team: TeamId) -> Result<Vec<TeamMember>, DirectoryError>;
}

/// Everything a full reconciliation needs from the remote side
pub trait DirectoryClient:
    UserDirectory + UserProvisioner + MembershipWriter + MembershipReader + std::fmt::Debug
{
}

impl<T> DirectoryClient for T where
    T: UserDirectory + UserProvisioner + MembershipWriter + MembershipReader + std::fmt::Debug
{
}
