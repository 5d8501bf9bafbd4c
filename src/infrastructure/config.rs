// src/infrastructure/config.rs
use crate::constants::{
    APP_DIR, AUTH_TIMEOUT_SECS, CONFIG_FILE, DEFAULT_AUTH_URL, DEFAULT_NLP_URL, ENV_AUTH_URL,
    ENV_NLP_URL, NLP_TIMEOUT_SECS, SESSION_FILE, WORKSPACE_FILE,
};
use crate::domain::ExportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML configuration for tagsmith
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_nlp_url")]
    pub nlp_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_nlp_timeout")]
    pub nlp_timeout_secs: u64,
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,
    /// Base URL new workspaces start with; empty means none.
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct AdminConfig {
    /// Accounts treated as admins in addition to those with the admin role.
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct StorageConfig {
    /// Directory for session and workspace files; empty means the platform data dir.
    #[serde(default)]
    pub dir: String,
}

// Default value functions
fn default_nlp_url() -> String { DEFAULT_NLP_URL.to_string() }
fn default_auth_url() -> String { DEFAULT_AUTH_URL.to_string() }
fn default_nlp_timeout() -> u64 { NLP_TIMEOUT_SECS }
fn default_auth_timeout() -> u64 { AUTH_TIMEOUT_SECS }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            nlp_url: default_nlp_url(),
            auth_url: default_auth_url(),
            nlp_timeout_secs: default_nlp_timeout(),
            auth_timeout_secs: default_auth_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load from `path` when it exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to TOML file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }
        std::fs::write(path.as_ref(), toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// `<config_dir>/tagsmith/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Directory holding session and workspace files
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if !self.storage.dir.trim().is_empty() {
            return Ok(PathBuf::from(self.storage.dir.trim()));
        }
        let dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(dir.join(APP_DIR))
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        Ok(self.storage_dir()?.join(SESSION_FILE))
    }

    pub fn workspace_path(&self) -> Result<PathBuf> {
        Ok(self.storage_dir()?.join(WORKSPACE_FILE))
    }

    /// Configured default base URL, `None` when blank
    pub fn default_base_url(&self) -> Option<String> {
        let base = self.export.base_url.trim();
        (!base.is_empty()).then(|| base.to_string())
    }

    /// Apply service URL overrides from `lookup` (an environment accessor)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_NLP_URL).filter(|u| !u.trim().is_empty()) {
            debug!(url = %url, "NLP URL overridden from environment");
            self.api.nlp_url = url;
        }
        if let Some(url) = lookup(ENV_AUTH_URL).filter(|u| !u.trim().is_empty()) {
            debug!(url = %url, "Auth URL overridden from environment");
            self.api.auth_url = url;
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}
