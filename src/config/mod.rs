//! Configuration loaded once at the process boundary

mod app_config;
mod manifest;

pub use app_config::{
    AppConfig, AuthConfig, ConfigError, DirectoryConfig, LogFormat, LoggingConfig, ReconcileConfig,
};
pub use manifest::{ManifestError, TeamManifest};
