use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    book::ControlMode,
    errors::{BookError, Result},
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

const DEFAULT_RETENTION: usize = 5;

/// Defaults applied to newly created books and to the JSON store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub default_currency: String,
    pub currency_fraction: u32,
    #[serde(default, skip_serializing_if = "ControlMode::is_empty")]
    pub control_mode: ControlMode,
    #[serde(default = "Config::retention_default")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_currency: "EUR".into(),
            currency_fraction: 100,
            control_mode: ControlMode::default(),
            backup_retention: DEFAULT_RETENTION,
        }
    }
}

impl Config {
    fn retention_default() -> usize {
        DEFAULT_RETENTION
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_currency.trim().is_empty() {
            return Err(BookError::Config("default_currency must not be empty".into()));
        }
        if self.currency_fraction == 0 {
            return Err(BookError::Config("currency_fraction must be positive".into()));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the configuration, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        tracing::debug!(path = %self.path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
