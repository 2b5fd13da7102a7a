//! Configuration management for Ascend

pub mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::progress::{ScorePolicy, StoreOptions, store::WELCOME_BADGE};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Custom catalog file (built-in 13-week program if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// Badge granted to new learners
    #[serde(default = "default_welcome_badge")]
    pub welcome_badge: String,

    /// Handling of quiz scores above 100
    #[serde(default)]
    pub score_policy: ScorePolicy,
}

fn default_welcome_badge() -> String {
    WELCOME_BADGE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            welcome_badge: default_welcome_badge(),
            score_policy: ScorePolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "ascend").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "ascend").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Load the configured catalog, falling back to the built-in program
    ///
    /// Fails if the catalog does not define the configured welcome badge.
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let catalog = Catalog::load(path)
                    .with_context(|| format!("Failed to load catalog {:?}", path))?;
                Arc::new(catalog)
            }
            None => Catalog::shared_default(),
        };

        if catalog.badge(&self.welcome_badge).is_none() {
            bail!("Welcome badge '{}' is not defined in the catalog", self.welcome_badge);
        }
        Ok(catalog)
    }

    /// Store options derived from this configuration
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions { welcome_badge: self.welcome_badge.clone(), score_policy: self.score_policy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressStore;
    use tempfile::TempDir;

    #[test]
    fn default_config_uses_builtin_catalog() {
        let config = Config::default();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.catalog().unwrap().total_weeks(), 13);
    }

    #[test]
    fn default_config_welcomes_with_first_step() {
        let config = Config::default();
        assert_eq!(config.welcome_badge, "first-step");
        assert_eq!(config.store_options().score_policy, ScorePolicy::Clamp);
    }

    #[test]
    fn config_deserializes_from_partial_json() {
        let json = r#"{"score_policy":"reject"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.score_policy, ScorePolicy::Reject);
        assert_eq!(config.welcome_badge, "first-step");
    }

    #[test]
    fn config_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config { catalog_path: Some("/tmp/catalog.json".into()), ..Config::default() };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config =
            Config { catalog_path: Some(dir.path().join("missing.json")), ..Config::default() };
        assert!(config.catalog().is_err());
    }

    #[test]
    fn custom_catalog_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let mut catalog = Catalog::default_program();
        catalog.weeks.truncate(2);
        std::fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();

        let config = Config { catalog_path: Some(path), ..Config::default() };
        assert_eq!(config.catalog().unwrap().total_weeks(), 2);
    }

    #[test]
    fn catalog_without_welcome_badge_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let mut catalog = Catalog::default_program();
        catalog.badges.retain(|b| b.id != "first-step");
        std::fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();

        let config = Config { catalog_path: Some(path), ..Config::default() };
        let err = config.catalog().unwrap_err();
        assert!(err.to_string().contains("first-step"));
    }

    #[test]
    fn unknown_welcome_badge_is_rejected() {
        let config = Config { welcome_badge: "no-such-badge".into(), ..Config::default() };
        assert!(config.catalog().is_err());

        let config = Config { welcome_badge: "streak-7".into(), ..Config::default() };
        assert!(config.catalog().is_ok());
    }

    #[test]
    fn reject_policy_reaches_the_store() {
        let config: Config = serde_json::from_str(r#"{"score_policy":"reject"}"#).unwrap();
        let mut store = ProgressStore::with_options(config.catalog().unwrap(), config.store_options());

        assert!(!store.complete_quiz("quiz-1-1", 150, 30));
        assert!(store.complete_quiz("quiz-1-1", 100, 30));
    }
}
