//! Configuration Loading
//!
//! Builds the `AppConfig` from an optional JSON file plus environment
//! variables. Environment values win over file values.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};

/// Configuration service for loading and saving settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    config: AppConfig,
}

impl ConfigService {
    /// Load configuration from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Load configuration with an explicit environment lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => AppConfig::default(),
        };
        config.apply_update(SettingsUpdate::from_lookup(lookup));
        config.validate().map_err(AppError::config)?;

        info!(
            project = %config.jira.project_key,
            model = %config.llm.model,
            from_file = path.is_some(),
            "configuration loaded"
        );

        Ok(Self {
            config_path: path.map(Path::to_path_buf),
            config,
        })
    }

    /// Read a configuration file without validating it. Required secrets
    /// may still arrive from the environment.
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    pub fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a clone of the current configuration
    pub fn get_config_clone(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
