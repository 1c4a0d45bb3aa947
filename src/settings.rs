use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_DIR: &str = "meeting-insights";
const SETTINGS_FILE: &str = "settings.toml";

pub const API_URL_ENV: &str = "MEETING_INSIGHTS_API_URL";
pub const TOKEN_ENV: &str = "MEETING_INSIGHTS_TOKEN";

/// Connection settings for the meeting backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("meeting-insights/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
            auth_token: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientSettings {
    /// Default location: `<config_dir>/meeting-insights/settings.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config = dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from the default path, then apply environment overrides.
    ///
    /// A missing or unreadable file is not an error; defaults are used instead.
    pub fn load() -> Self {
        let mut settings = match Self::default_path() {
            Ok(path) => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        };
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Read settings from `path`. Returns defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let settings: ClientSettings = toml::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Override fields from the environment, looked up through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.auth_token = Some(token);
        }
    }
}
