//! Reconcile service

mod service;

pub use service::{
    MembershipPlan, PreviousState, ReconcileRequest, ReconcileService, ReconcileSettings,
};
