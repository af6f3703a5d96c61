//! Editor configuration
//!
//! Stored as RON under the platform config directory. A missing file means
//! defaults; an unreadable or corrupt one also falls back to defaults and
//! records why, so the console can tell the user.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sp_core::{DEFAULT_RACK_SPACING, MOVE_STEP};

use crate::session::{Role, Session};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "SHELFPLAN_API_URL";

/// Environment variable overriding `auth_token`
pub const TOKEN_ENV: &str = "SHELFPLAN_TOKEN";

const CONFIG_DIR_NAME: &str = "shelfplan";
const CONFIG_FILE_NAME: &str = "config.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Layout API root; empty keeps layouts in memory only
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub move_step: f32,
    pub rack_spacing: f32,
    pub key_cooldown_ms: u64,
    /// Lifetime of transient notifications
    pub notification_secs: u64,
    pub auth_token: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub role: Role,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            move_step: MOVE_STEP,
            rack_spacing: DEFAULT_RACK_SPACING,
            key_cooldown_ms: 100,
            notification_secs: 3,
            auth_token: None,
            user_id: None,
            user_name: None,
            role: Role::default(),
        }
    }
}

impl EditorConfig {
    pub fn uses_remote(&self) -> bool {
        !self.api_base_url.trim().is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn key_cooldown(&self) -> Duration {
        Duration::from_millis(self.key_cooldown_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    /// Session facts carried by this configuration
    pub fn session(&self) -> Session {
        let defaults = Session::default();
        Session {
            user_id: self.user_id.clone(),
            name: self.user_name.clone().unwrap_or(defaults.name),
            role: self.role,
            token: self.auth_token.clone(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("No configuration directory on this platform")]
    NoConfigDir,
}

/// Loaded configuration plus where it lives on disk
pub struct ConfigManager {
    config: EditorConfig,
    path: Option<PathBuf>,
    reset_reason: Option<String>,
}

impl ConfigManager {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Self {
        let mut manager = match Self::default_path() {
            Some(path) => Self::load_or_create(path),
            None => {
                tracing::warn!("No config directory available, using defaults");
                Self {
                    config: EditorConfig::default(),
                    path: None,
                    reset_reason: None,
                }
            }
        };
        manager.apply_overrides(std::env::var(API_URL_ENV).ok(), std::env::var(TOKEN_ENV).ok());
        manager
    }

    /// Load from `path`, writing a default file there if none exists yet
    pub fn load_or_create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let first_run = !path.exists();
        let manager = Self::load_from(path);
        if first_run && let Err(e) = manager.save() {
            tracing::warn!("Could not write default config: {}", e);
        }
        manager
    }

    /// Load from `path`, falling back to defaults
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (config, reset_reason) = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match ron::from_str(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        (config, None)
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file: {}", e);
                        (
                            EditorConfig::default(),
                            Some(format!("Configuration file was corrupted: {}", e)),
                        )
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config file: {}", e);
                    (
                        EditorConfig::default(),
                        Some(format!("Could not read configuration file: {}", e)),
                    )
                }
            }
        } else {
            tracing::info!("No config file found, using defaults");
            (EditorConfig::default(), None)
        };

        Self {
            config,
            path: Some(path),
            reset_reason,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Why the config was reset to defaults, once
    pub fn take_reset_reason(&mut self) -> Option<String> {
        self.reset_reason.take()
    }

    /// Non-empty values replace the API URL and token
    pub fn apply_overrides(&mut self, api_url: Option<String>, token: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            tracing::debug!("API URL overridden from environment");
            self.config.api_base_url = url;
        }
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            self.config.auth_token = Some(token);
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        tracing::info!("Config saved to {:?}", path);
        Ok(())
    }
}
