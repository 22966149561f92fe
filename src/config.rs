//! Configuration Management
//!
//! Handles persistent configuration storage for platctl and supplies the
//! polling budget to the actor through [`ConfigProvider`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default wall-clock budget for polling a job to completion
pub const DEFAULT_POLLING_TIMEOUT_SECS: u64 = 600;

/// Default interval between job polls
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 3;

pub const ENV_API: &str = "PLATCTL_API";
pub const ENV_TOKEN: &str = "PLATCTL_TOKEN";
pub const ENV_POLLING_TIMEOUT: &str = "PLATCTL_POLLING_TIMEOUT";

/// Source of process-wide polling settings
pub trait ConfigProvider {
    /// Wall-clock budget for driving a job to a terminal state
    fn polling_deadline(&self) -> Duration;

    /// Pause between consecutive job polls
    fn polling_interval(&self) -> Duration;
}

/// A named plugin repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRepo {
    pub name: String,
    pub url: String,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the control-plane API
    #[serde(default)]
    pub api_endpoint: Option<String>,
    /// Bearer token sent with every request
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_polling_timeout")]
    pub polling_timeout_secs: u64,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_secs: u64,
    #[serde(default)]
    pub plugin_repos: Vec<PluginRepo>,
}

fn default_polling_timeout() -> u64 {
    DEFAULT_POLLING_TIMEOUT_SECS
}

fn default_polling_interval() -> u64 {
    DEFAULT_POLLING_INTERVAL_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: None,
            access_token: None,
            polling_timeout_secs: DEFAULT_POLLING_TIMEOUT_SECS,
            polling_interval_secs: DEFAULT_POLLING_INTERVAL_SECS,
            plugin_repos: Vec::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("platctl").join("config.json"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api) = lookup(ENV_API) {
            self.api_endpoint = Some(api);
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(timeout) = lookup(ENV_POLLING_TIMEOUT) {
            match timeout.trim().parse() {
                Ok(secs) => self.polling_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid {}: {}", ENV_POLLING_TIMEOUT, timeout),
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Register a plugin repository; names are unique, case-insensitively
    pub fn add_plugin_repo(&mut self, name: &str, url: &str) -> Result<()> {
        if self
            .plugin_repos
            .iter()
            .any(|repo| repo.name.eq_ignore_ascii_case(name))
        {
            anyhow::bail!("Plugin repo named \"{}\" already exists", name);
        }
        url::Url::parse(url).with_context(|| format!("Invalid plugin repo URL: {}", url))?;

        self.plugin_repos.push(PluginRepo {
            name: name.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }
}

impl ConfigProvider for Config {
    fn polling_deadline(&self) -> Duration {
        Duration::from_secs(self.polling_timeout_secs)
    }

    fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }
}
