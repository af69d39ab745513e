//! Directory domain module
//!
//! Abstract view of the remote user directory: the operations reconciliation
//! consumes and the structured error they fail with.

mod client;
mod error;

pub use client::{DirectoryClient, MembershipReader, MembershipWriter, UserDirectory, UserProvisioner};
pub use error::{DirectoryError, DirectoryErrorKind};

#[cfg(test)]
pub use client::{MockMembershipReader, MockMembershipWriter, MockUserProvisioner};
