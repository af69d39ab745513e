//! Infrastructure layer - Directory clients and services

pub mod directory;
pub mod logging;
pub mod reconcile;
