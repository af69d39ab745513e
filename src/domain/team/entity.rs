//! Team and user identity types

use serde::{Deserialize, Serialize};

use super::validation::{validate_team_id, TeamValidationError};

/// Remote team identifier - opaque positive integer assigned by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TeamId(i64);

impl TeamId {
    /// Create a new TeamId after validation
    pub fn new(id: i64) -> Result<Self, TeamValidationError> {
        validate_team_id(id)?;
        Ok(Self(id))
    }

    /// Get the inner value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for TeamId {
    type Error = TeamValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamId> for i64 {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote user identity. Zero means "not yet resolved".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Sentinel carried by changes the resolver has not visited yet
    pub const UNRESOLVED: UserId = UserId(0);

    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn is_resolved(&self) -> bool {
        self.0 != 0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a directory snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DirectoryUser {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            login: None,
            name: None,
        }
    }

    /// Set login (builder pattern)
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }
}

/// One entry of a remote team's member listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub email: String,
    pub login: String,
}

impl TeamMember {
    pub fn new(
        user_id: impl Into<UserId>,
        email: impl Into<String>,
        login: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            login: login.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_id_valid() {
        let id = TeamId::new(42).unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_team_id_invalid() {
        assert!(TeamId::new(0).is_err());
        assert!(TeamId::new(-7).is_err());
    }

    #[test]
    fn test_team_id_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<TeamId>("0").is_err());
        assert_eq!(serde_json::from_str::<TeamId>("3").unwrap().get(), 3);
    }

    #[test]
    fn test_user_id_resolution() {
        assert!(!UserId::UNRESOLVED.is_resolved());
        assert!(!UserId::default().is_resolved());
        assert!(UserId::new(100).is_resolved());
    }

    #[test]
    fn test_directory_user_builder() {
        let user = DirectoryUser::new(5, "a@x.com").with_login("alice");

        assert_eq!(user.id, UserId::new(5));
        assert_eq!(user.login.as_deref(), Some("alice"));
        assert!(user.name.is_none());
    }
}
