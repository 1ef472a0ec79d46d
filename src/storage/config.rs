//! Configuration handling for antledger
//!
//! Configuration is read from `antledger.toml` in the working directory (or an
//! explicit `--config` path), falling back to `config.toml` in the platform
//! config directory. Every key has a default, so no file is required.
//!
//! Relative paths in a config file are resolved against the directory that
//! contains it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ClassifyMode;
use crate::sql::SqlOptions;

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "antledger.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for earliest-appearance lookups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Repository searched with `git log -S`
    pub repo: PathBuf,

    /// Concurrent lookups
    pub workers: usize,

    /// Per-lookup limit in seconds
    pub timeout_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            workers: 4,
            timeout_secs: 30,
        }
    }
}

impl HistoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Curated site data JSON
    pub site_data: PathBuf,

    /// Issue tracker export JSON
    pub raw_issues: PathBuf,

    /// Newline-delimited listing checked by `check`
    pub legacy_list: PathBuf,

    /// Directory receiving generated SQL
    pub out_dir: PathBuf,

    /// How unparseable issue titles are treated
    pub mode: ClassifyMode,

    /// Accounts and migration labels
    pub sql: SqlOptions,

    /// History lookups
    pub history: HistoryConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_data: PathBuf::from("data/site_data.json"),
            raw_issues: PathBuf::from("data/raw_issues.json"),
            legacy_list: PathBuf::from("ants.txt"),
            out_dir: PathBuf::from("out"),
            mode: ClassifyMode::default(),
            sql: SqlOptions::default(),
            history: HistoryConfig::default(),
            source: None,
        }
    }
}

impl Config {
    /// Loads configuration, preferring `explicit`, then the working directory,
    /// then the global file
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        let local = Path::new(CONFIG_FILE);
        if local.is_file() {
            return Self::load_file(local);
        }

        match Self::global_config_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "antledger", "antledger")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Loads one config file, resolving its relative paths
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.history.workers == 0 {
            return Err(ConfigError::Invalid(
                "history.workers must be at least 1".to_string(),
            ));
        }
        if self.history.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "history.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.sql.migration_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "sql.migration_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.site_data,
            &mut self.raw_issues,
            &mut self.legacy_list,
            &mut self.out_dir,
            &mut self.history.repo,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Writes the default configuration to `path` unless a file is already
    /// there. Returns whether a file was written.
    pub fn write_default(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        let content =
            toml::to_string_pretty(&Self::default()).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(true)
    }
}
