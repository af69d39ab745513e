//! Team manifest files

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::team::TeamId;
use crate::infrastructure::reconcile::{PreviousState, ReconcileRequest};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Desired membership of one team, as written by an operator
///
/// ```toml
/// team_id = 12
/// users = ["u1@example.com", "u2@example.com"]
/// # last applied membership; omitted means "read it from the directory"
/// previous = ["u1@example.com"]
/// create_users = false
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamManifest {
    pub team_id: TeamId,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub previous: Option<Vec<String>>,
    #[serde(default)]
    pub create_users: Option<bool>,
}

impl TeamManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build a reconcile request. The previous membership is read from the
    /// directory when `from_remote` is set or the manifest records none.
    pub fn to_request(&self, from_remote: bool) -> ReconcileRequest {
        let previous = match (&self.previous, from_remote) {
            (Some(keys), false) => PreviousState::Keys(keys.clone()),
            _ => PreviousState::Remote,
        };

        ReconcileRequest {
            team: self.team_id,
            previous,
            desired: self.users.clone(),
            create_users: self.create_users,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_manifest() {
        let manifest: TeamManifest = toml::from_str(
            r#"
            team_id = 12
            users = ["u1@x.com", "u2@x.com"]
            previous = ["u1@x.com"]
            create_users = false
            "#,
        )
        .unwrap();

        assert_eq!(manifest.team_id, TeamId::new(12).unwrap());
        assert_eq!(manifest.users.len(), 2);

        let request = manifest.to_request(false);
        assert_eq!(
            request.previous,
            PreviousState::Keys(vec!["u1@x.com".to_string()])
        );
        assert_eq!(request.create_users, Some(false));

        assert_eq!(manifest.to_request(true).previous, PreviousState::Remote);
    }

    #[test]
    fn test_missing_previous_reads_remote() {
        let manifest: TeamManifest = toml::from_str("team_id = 3").unwrap();
        let request = manifest.to_request(false);

        assert_eq!(request.previous, PreviousState::Remote);
        assert!(request.desired.is_empty());
        assert!(request.create_users.is_none());
    }

    #[test]
    fn test_rejects_invalid_team_id() {
        assert!(toml::from_str::<TeamManifest>("team_id = 0").is_err());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(toml::from_str::<TeamManifest>("team_id = 1\nmembers = []").is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "team_id = 9\nusers = [\"a@x.com\"]").unwrap();

        let manifest = TeamManifest::load(file.path()).unwrap();
        assert_eq!(manifest.users, vec!["a@x.com".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = TeamManifest::load(Path::new("/nonexistent/team.toml"));
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }
}
