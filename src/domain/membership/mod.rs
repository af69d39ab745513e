//! Membership domain module
//!
//! Membership sets are keyed by user identifier (an email address) and are
//! rebuilt for every reconciliation from the last observed and the desired
//! state. Diffing them yields unresolved add/remove changes.

mod differ;
mod entity;
mod validation;

pub use differ::{diff, diff_keys};
pub use entity::{ChangeKind, Member, MembershipChange, MembershipSet};
pub use validation::{normalize_key, MembershipError, SetOrigin};
