//! Reconciliation domain module
//!
//! Resolves membership changes to remote identities and applies them:
//! diff, then resolve, then apply. Each stage fails fast; nothing is retried
//! or rolled back.

mod applier;
mod error;
mod orchestrator;
mod report;
mod resolver;

pub use applier::{apply, ApplyOutcome};
pub use error::ReconcileError;
pub use orchestrator::{current_membership, reconcile};
pub use report::ReconcileReport;
pub use resolver::{resolve, KnownUsers, Resolution};
