//! Reconciliation errors

use thiserror::Error;

use crate::domain::directory::DirectoryError;
use crate::domain::membership::{ChangeKind, MembershipError, SetOrigin};
use crate::domain::team::{TeamId, UserId};

/// Errors that abort a reconciliation
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("User '{key}' cannot be specified multiple times in the {origin} membership")]
    DuplicateKey { key: String, origin: SetOrigin },

    #[error("Empty user identifier in the {origin} membership")]
    EmptyKey { origin: SetOrigin },

    #[error("Error adding user {key}. User does not exist in the directory")]
    UnknownUser { key: String },

    #[error("Failed to create user '{key}': {source}")]
    Creation {
        key: String,
        #[source]
        source: DirectoryError,
    },

    #[error("Failed to {operation} user {user} ('{key}') on team {team}: {source}")]
    Apply {
        team: TeamId,
        user: UserId,
        key: String,
        operation: ChangeKind,
        #[source]
        source: DirectoryError,
    },

    #[error("Failed to fetch directory snapshot: {source}")]
    Snapshot {
        #[source]
        source: DirectoryError,
    },

    #[error("Failed to list members of team {team}: {source}")]
    MemberListing {
        team: TeamId,
        #[source]
        source: DirectoryError,
    },

    #[error("Member '{key}' has no resolved user id")]
    UnresolvedMember { key: String },

    #[error("A reconciliation for team {team} is already in progress")]
    Busy { team: TeamId },
}

impl From<MembershipError> for ReconcileError {
    fn from(error: MembershipError) -> Self {
        match error {
            MembershipError::DuplicateKey { key, origin } => Self::DuplicateKey { key, origin },
            MembershipError::EmptyKey { origin } => Self::EmptyKey { origin },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_membership_error() {
        let error: ReconcileError = MembershipError::DuplicateKey {
            key: "a@x.com".to_string(),
            origin: SetOrigin::Desired,
        }
        .into();

        assert!(matches!(
            error,
            ReconcileError::DuplicateKey { ref key, origin: SetOrigin::Desired } if key == "a@x.com"
        ));
    }

    #[test]
    fn test_apply_error_carries_context() {
        let error = ReconcileError::Apply {
            team: TeamId::new(3).unwrap(),
            user: UserId::new(100),
            key: "a@x.com".to_string(),
            operation: ChangeKind::Remove,
            source: DirectoryError::remote(500, "boom"),
        };

        assert_eq!(
            error.to_string(),
            "Failed to remove user 100 ('a@x.com') on team 3: Directory HTTP 500 error: boom"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_unknown_user_message() {
        let error = ReconcileError::UnknownUser {
            key: "b@x.com".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Error adding user b@x.com. User does not exist in the directory"
        );
    }
}
