//! Configuration management for html5-video
//!
//! This module handles loading and managing configuration from config
//! files and environment variables.

use crate::player::PlayerConfig;
use crate::utils::error::{Html5VideoError, IntoVideoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Receiver application id of the Cast default media receiver
pub const DEFAULT_MEDIA_RECEIVER_APP_ID: &str = "CC1AD845";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Player configuration
    pub player: PlayerConfig,

    /// Cast configuration
    pub cast: CastConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Cast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Accept a cast framework when the host reports one
    pub enabled: bool,

    /// Receiver application to launch on the remote device
    pub receiver_application_id: String,

    /// Which existing sessions may be joined automatically
    pub auto_join_policy: AutoJoinPolicy,
}

/// Session auto-join policy passed to the cast context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoJoinPolicy {
    TabAndOriginScoped,
    OriginScoped,
    PageScoped,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            receiver_application_id: DEFAULT_MEDIA_RECEIVER_APP_ID.to_string(),
            auto_join_policy: AutoJoinPolicy::OriginScoped,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/html5-video/config.toml on Linux)
    /// 3. User config file (~/.config/html5-video/config.toml on Linux)
    /// 4. Environment variables (HTML5_VIDEO_* prefix)
    ///
    /// Validation is left to the caller, since video sources are commonly
    /// supplied after loading.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config = Self::from_file(&system_path)?;
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::from_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Read a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .config_err("Failed to read config file")?;

        toml::from_str(&contents).config_err("Failed to parse config file")
    }

    /// Save configuration to user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| Html5VideoError::config("Cannot determine user config path"))?;
        self.save_to(&path)
    }

    /// Write configuration as TOML to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .config_err("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).config_err("Failed to serialize config")?;

        std::fs::write(path, toml).config_err("Failed to write config file")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(poster) = std::env::var("HTML5_VIDEO_POSTER") {
            self.player.poster = if poster.is_empty() { None } else { Some(poster) };
        }

        if let Ok(debug) = std::env::var("HTML5_VIDEO_DEBUG") {
            self.player.debug = debug.parse()
                .map_err(|_| Html5VideoError::config("Invalid HTML5_VIDEO_DEBUG"))?;
        }

        if let Ok(enabled) = std::env::var("HTML5_VIDEO_CAST_ENABLED") {
            self.cast.enabled = enabled.parse()
                .map_err(|_| Html5VideoError::config("Invalid HTML5_VIDEO_CAST_ENABLED"))?;
        }

        if let Ok(app_id) = std::env::var("HTML5_VIDEO_CAST_APP_ID") {
            self.cast.receiver_application_id = app_id;
        }

        if let Ok(log_level) = std::env::var("HTML5_VIDEO_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.player.validate()?;

        if self.cast.enabled && self.cast.receiver_application_id.trim().is_empty() {
            return Err(Html5VideoError::config("Cast receiver application id must not be empty"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(Html5VideoError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level,
                valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/html5-video/config.toml"));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA").ok()
            .map(|p| PathBuf::from(p).join("html5-video").join("config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from("/Library/Application Support/html5-video/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("html5-video").join("config.toml"))
    }
}
