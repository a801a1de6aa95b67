//! Service-account credential blob.

use crate::error::CredentialsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Credentials shaped like a service-account key file.
///
/// Only `client_email` is required; everything else is carried through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub client_email: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credentials {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load credentials from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CredentialsError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CredentialsError::NotFound(path.to_path_buf())
            } else {
                CredentialsError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_json(&content).map_err(|source| CredentialsError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_json_keeps_extra_keys() {
        let creds = Credentials::from_json(
            r#"{"type": "service_account", "client_email": "sync@example.iam",
                "project_id": "race", "private_key_id": "abc"}"#,
        )
        .unwrap();
        assert_eq!(creds.client_email, "sync@example.iam");
        assert_eq!(creds.kind.as_deref(), Some("service_account"));
        assert_eq!(creds.project_id.as_deref(), Some("race"));
        assert_eq!(creds.extra["private_key_id"], "abc");
    }

    #[test]
    fn test_from_json_requires_client_email() {
        assert!(Credentials::from_json(r#"{"type": "service_account"}"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Credentials::load(&dir.path().join("credentials.json")).unwrap_err();
        assert!(matches!(err, CredentialsError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Credentials::load(&path).unwrap_err();
        assert!(matches!(err, CredentialsError::Invalid { .. }));
    }
}
