//! CLI configuration
//!
//! Settings resolve in this order: command-line flag (or its environment
//! variable), config file, built-in default.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pizzeria_storage::{DatabaseUrl, DEFAULT_DATABASE_URL};
use serde::{Deserialize, Serialize};

/// Address the API binds to when nothing else is configured
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5555";

/// Get default config file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pizzeria")
        .join("config.toml")
}

/// Contents of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_addr: Option<String>,
}

impl Config {
    /// Load the config file, or the defaults if it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["database_url", "bind_addr"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "database_url" => self.database_url.clone(),
            "bind_addr" => self.bind_addr.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "database_url" => {
                value.parse::<DatabaseUrl>()?;
                self.database_url = Some(value.to_string());
            }
            "bind_addr" => self.bind_addr = Some(value.to_string()),
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    /// Pick the connection string: flag/env first, then the file, then the default
    pub fn database_url(&self, flag: Option<&str>) -> anyhow::Result<DatabaseUrl> {
        let raw = flag
            .or(self.database_url.as_deref())
            .unwrap_or(DEFAULT_DATABASE_URL);
        Ok(raw.parse()?)
    }

    pub fn bind_addr(&self, flag: Option<&str>) -> String {
        flag.or(self.bind_addr.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDR)
            .to_string()
    }
}
