//! Configuration Management
//!
//! Handles persistent configuration storage for the cloapi CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "CLO_BASE_URL";
/// Environment variable overriding the auth key
pub const AUTH_KEY_ENV: &str = "CLO_AUTH_KEY";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Bearer token for the API
    #[serde(default)]
    pub auth_key: Option<String>,
    /// Last used project ID
    #[serde(default)]
    pub project_id: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloapi").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
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

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective base URL (CLI > env > config)
    pub fn effective_base_url(&self, cli: Option<&str>) -> Option<String> {
        pick(cli, BASE_URL_ENV, self.base_url.as_deref())
    }

    /// Get effective auth key (CLI > env > config)
    pub fn effective_auth_key(&self, cli: Option<&str>) -> Option<String> {
        pick(cli, AUTH_KEY_ENV, self.auth_key.as_deref())
    }

    /// Get effective project (CLI > config)
    pub fn effective_project(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string).or_else(|| self.project_id.clone())
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }
}

fn pick(cli: Option<&str>, env: &str, stored: Option<&str>) -> Option<String> {
    cli.map(str::to_string)
        .or_else(|| std::env::var(env).ok().filter(|v| !v.is_empty()))
        .or_else(|| stored.map(str::to_string))
}
