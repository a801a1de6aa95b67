//! Configuration loader with tier-based merging.

use super::merge::deep_merge_all;
use super::types::Config;
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config file tier, lowest priority first. Defaults sit below these and
/// environment overrides above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Project-level config ($CWD/pilot-sync/)
    Project,
    /// User-level config (~/.pilot-sync/)
    User,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
        }
    }
}

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// `PILOT_SYNC_PROJECT_DIR` or `./pilot-sync`, and `PILOT_SYNC_USER_DIR`
    /// or `~/.pilot-sync`.
    pub fn discover() -> Self {
        let project_dir = std::env::var("PILOT_SYNC_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("pilot-sync")));

        let user_dir = std::env::var("PILOT_SYNC_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".pilot-sync")));

        Self {
            project_dir,
            user_dir,
        }
    }

    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    fn tier_files(&self) -> Vec<(ConfigTier, PathBuf)> {
        let mut files = Vec::new();
        if let Some(ref dir) = self.project_dir {
            files.push((ConfigTier::Project, dir.join("config.yaml")));
        }
        if let Some(ref dir) = self.user_dir {
            files.push((ConfigTier::User, dir.join("config.yaml")));
        }
        files
    }
}

/// Loads and merges every configuration tier.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: Config,
    /// Files that contributed, lowest tier first.
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// `PILOT_SYNC_CONFIG_PATH` replaces the file tiers with a single file;
    /// environment overrides still apply on top.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        if let Ok(explicit) = std::env::var("PILOT_SYNC_CONFIG_PATH") {
            return Self::load_file(paths, PathBuf::from(explicit));
        }

        let mut tiers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut sources = Vec::new();

        for (tier, file) in paths.tier_files() {
            if !file.exists() {
                continue;
            }
            match read_yaml(&file) {
                Ok(value) => {
                    tiers.push(value);
                    sources.push(file);
                }
                Err(e) => warn!("Ignoring {} config {}: {:#}", tier, file.display(), e),
            }
        }

        let mut config: Config = serde_json::from_value(deep_merge_all(tiers))
            .context("invalid configuration")?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    /// Load one explicit file instead of searching the tiers.
    pub fn load_file(paths: ConfigPaths, path: PathBuf) -> Result<Self> {
        let mut config = Config::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(Self {
            paths,
            config,
            sources: vec![path],
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&content)?;
    Ok(value)
}

/// Apply `PILOT_SYNC_*` overrides. Unparseable log levels are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = var("PILOT_SYNC_DB_PATH") {
        config.database.path = PathBuf::from(path);
    }
    if let Some(dir) = var("PILOT_SYNC_SHEETS_DIR") {
        config.source.sheets_dir = PathBuf::from(dir);
    }
    if let Some(path) = var("PILOT_SYNC_CREDENTIALS") {
        config.source.credentials_path = PathBuf::from(path);
    }
    if let Some(name) = var("PILOT_SYNC_SHEET_NAME") {
        config.source.sheet_name = Some(name).filter(|n| !n.is_empty());
    }
    if let Some(level) = var("PILOT_SYNC_LOG_LEVEL") {
        match LogLevel::parse(&level) {
            Some(level) => config.logging.level = level,
            None => warn!("Ignoring unknown PILOT_SYNC_LOG_LEVEL '{}'", level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("config.yaml"), content).unwrap();
    }

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert!(loader.sources().is_empty());
        assert_eq!(loader.config().source.sheets_dir, PathBuf::from("sheets"));
    }

    #[test]
    fn test_user_config_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("pilot-sync");
        let user_dir = temp.path().join("user");
        write_config(
            &project_dir,
            "source:\n  sheet_name: Club Night\n  sheets_dir: /data/sheets\n",
        );
        write_config(&user_dir, "source:\n  sheet_name: Race Day\n");

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(user_dir));
        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let config = loader.config();

        assert_eq!(config.source.sheet_name.as_deref(), Some("Race Day"));
        assert_eq!(config.source.sheets_dir, PathBuf::from("/data/sheets"));
        assert_eq!(loader.sources().len(), 2);
    }

    #[test]
    fn test_broken_tier_is_skipped() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("pilot-sync");
        write_config(&project_dir, "source: [not, a, map");

        let paths = ConfigPaths::with_dirs(Some(project_dir), None);
        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PILOT_SYNC_DB_PATH", "/tmp/pilots.db"),
            ("PILOT_SYNC_SHEET_NAME", "Finals"),
            ("PILOT_SYNC_LOG_LEVEL", "warning"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/tmp/pilots.db"));
        assert_eq!(config.source.sheet_name.as_deref(), Some("Finals"));
        assert_eq!(config.logging.level, LogLevel::Warning);
        assert_eq!(config.source.credentials_path, PathBuf::from("credentials.json"));
    }

    #[test]
    fn test_env_bad_level_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| {
            (k == "PILOT_SYNC_LOG_LEVEL").then(|| "loud".to_string())
        });
        assert_eq!(config.logging.level, LogLevel::Info);
    }
}
