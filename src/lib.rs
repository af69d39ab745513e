//! Team Membership Sync
//!
//! Reconciles the membership of directory teams with a desired list of users:
//! - Diffs previous and desired membership into add/remove changes
//! - Resolves users against the directory, optionally creating missing ones
//! - Applies changes in order, treating "already applied" as success

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, TeamManifest};
pub use domain::{ReconcileError, ReconcileReport};
pub use infrastructure::directory::{HttpDirectoryClient, InMemoryDirectory};
pub use infrastructure::reconcile::{ReconcileRequest, ReconcileService};
