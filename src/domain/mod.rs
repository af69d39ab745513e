//! Domain layer - Membership sets, diffing and reconciliation

pub mod directory;
pub mod membership;
pub mod reconcile;
pub mod team;

pub use directory::{
    DirectoryClient, DirectoryError, DirectoryErrorKind, MembershipReader, MembershipWriter,
    UserDirectory, UserProvisioner,
};
pub use membership::{
    diff, diff_keys, ChangeKind, Member, MembershipChange, MembershipError, MembershipSet,
    SetOrigin,
};
pub use reconcile::{current_membership, reconcile, ReconcileError, ReconcileReport};
pub use team::{DirectoryUser, TeamId, TeamMember, UserId};
