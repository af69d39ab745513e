use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::infrastructure::directory::{DirectoryAuth, HttpDirectoryConfig};
use crate::infrastructure::reconcile::ReconcileSettings;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub directory: DirectoryConfig,
    pub reconcile: ReconcileConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct DirectoryConfig {
    #[validate(url(message = "directory.base_url must be an absolute URL"))]
    pub base_url: String,
    #[validate(range(min = 1, message = "directory.org_id must be at least 1"))]
    pub org_id: i64,
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    #[validate(range(min = 1, max = 5000))]
    pub page_size: usize,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    #[default]
    None,
    Token {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub create_users: bool,
    /// Login left out when reading current members; empty disables
    pub ignored_login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            org_id: 1,
            timeout_secs: 30,
            page_size: 1000,
            auth: AuthConfig::default(),
        }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            create_users: true,
            ignored_login: "admin".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load layered configuration and validate it.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/local`, the
    /// explicit file if given, then `TEAM_SYNC_*` environment variables with
    /// `__` separating nested keys (`TEAM_SYNC_DIRECTORY__BASE_URL`).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("TEAM_SYNC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Typed settings for the HTTP directory client
    pub fn directory_client_config(&self) -> HttpDirectoryConfig {
        let auth = match &self.directory.auth {
            AuthConfig::None => DirectoryAuth::None,
            AuthConfig::Token { token } => DirectoryAuth::Token(token.clone()),
            AuthConfig::Basic { username, password } => DirectoryAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            },
        };

        HttpDirectoryConfig::new(self.directory.base_url.clone())
            .with_org_id(self.directory.org_id)
            .with_timeout(Duration::from_secs(self.directory.timeout_secs))
            .with_page_size(self.directory.page_size)
            .with_auth(auth)
    }

    /// Typed settings for the reconcile service
    pub fn reconcile_settings(&self) -> ReconcileSettings {
        let ignored_login = self.reconcile.ignored_login.trim();

        ReconcileSettings {
            create_users: self.reconcile.create_users,
            ignored_login: (!ignored_login.is_empty()).then(|| ignored_login.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
        assert!(config.reconcile.create_users);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_explicit_file() {
        let file = write_config(
            r#"
            [directory]
            base_url = "https://grafana.example.com"
            org_id = 4
            auth = { type = "token", token = "abc" }

            [reconcile]
            create_users = false
            ignored_login = ""

            [logging]
            format = "json"
            "#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.directory.org_id, 4);
        assert_eq!(config.directory.timeout_secs, 30);
        assert_eq!(
            config.directory.auth,
            AuthConfig::Token {
                token: "abc".to_string()
            }
        );
        assert_eq!(config.logging.format, LogFormat::Json);

        let settings = config.reconcile_settings();
        assert!(!settings.create_users);
        assert!(settings.ignored_login.is_none());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let file = write_config(
            r#"
            [directory]
            base_url = "not a url"
            "#,
        );

        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_org_id_is_rejected() {
        let mut config = AppConfig::default();
        config.directory.org_id = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_directory_client_config() {
        let mut config = AppConfig::default();
        config.directory.timeout_secs = 5;
        config.directory.auth = AuthConfig::Basic {
            username: "admin".to_string(),
            password: "secret".to_string(),
        };

        let client_config = config.directory_client_config();

        assert_eq!(client_config.timeout, Duration::from_secs(5));
        assert_eq!(client_config.org_id, 1);
        assert!(matches!(client_config.auth, DirectoryAuth::Basic { .. }));
    }

    #[test]
    fn test_default_ignored_login() {
        let settings = AppConfig::default().reconcile_settings();
        assert_eq!(settings.ignored_login.as_deref(), Some("admin"));
    }
}
