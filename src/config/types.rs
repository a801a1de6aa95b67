//! Configuration types.

use crate::logging::LogLevel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("pilot-sync/pilots.db")
}

/// Where sheets and credentials come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Sheet to use when the database has no `sheet_name` option.
    #[serde(default)]
    pub sheet_name: Option<String>,

    /// Directory holding the sheet files.
    #[serde(default = "default_sheets_dir")]
    pub sheets_dir: PathBuf,

    /// Service-account credential file.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sheet_name: None,
            sheets_dir: default_sheets_dir(),
            credentials_path: default_credentials_path(),
        }
    }
}

fn default_sheets_dir() -> PathBuf {
    PathBuf::from("sheets")
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for job logging.
    #[serde(default)]
    pub level: LogLevel,
}

impl Config {
    /// Load configuration from a single YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.database.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
