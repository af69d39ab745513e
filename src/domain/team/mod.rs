//! Team domain module
//!
//! Teams live in the remote directory; this crate only refers to them by id
//! and never mutates them except through membership changes.

mod entity;
mod validation;

pub use entity::{DirectoryUser, TeamId, TeamMember, UserId};
pub use validation::{validate_team_id, TeamValidationError};
