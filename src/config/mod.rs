use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{BudgetError, Result},
    ledger::UserId,
    utils::{app_data_dir, ensure_dir, tmp_path, write_atomic},
};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_DATA_FILE: &str = "store.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Store document; relative paths resolve against the app data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<UserId>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        let path = base.join(CONFIG_DIR).join(CONFIG_FILE);
        Self { base, path }
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path).map_err(config_error)?;
        serde_json::from_str(&data).map_err(config_error)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).map_err(config_error)?;
        }
        let json = serde_json::to_string_pretty(config).map_err(config_error)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json).map_err(config_error)?;
        fs::rename(&tmp, &self.path).map_err(config_error)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store path for `config`, falling back to `<base>/store.json`.
    pub fn resolve_data_file(&self, config: &Config) -> PathBuf {
        match &config.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => self.base.join(DEFAULT_DATA_FILE),
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn config_error(err: impl std::fmt::Display) -> BudgetError {
    BudgetError::Config(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        let config = Config {
            data_file: Some(PathBuf::from("ledger.json")),
            default_user: Some(UserId::new()),
            log_filter: Some("budget_progress=debug".into()),
        };
        manager.save(&config).unwrap();
        assert!(manager.path().exists());
        assert!(!tmp_path(manager.path()).exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        fs::write(manager.path(), "[1, 2").unwrap();
        assert!(matches!(manager.load(), Err(BudgetError::Config(_))));
    }

    #[test]
    fn relative_data_file_resolves_against_base() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        let config = Config {
            data_file: Some(PathBuf::from("ledger.json")),
            ..Config::default()
        };
        assert_eq!(manager.resolve_data_file(&config), dir.path().join("ledger.json"));
        assert_eq!(
            manager.resolve_data_file(&Config::default()),
            dir.path().join("store.json")
        );
    }
}
