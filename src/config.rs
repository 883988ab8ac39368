//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, DEFAULT_HOST, DEFAULT_PORT};
use crate::engine::EngineSettings;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding one `session_<id>.json` document per session.
    pub sessions_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        // Fall back to a local directory when no platform config dir exists
        let sessions_dir =
            Self::default_sessions_dir().unwrap_or_else(|_| PathBuf::from(".sessions"));

        Self { sessions_dir }
    }
}

impl PathConfig {
    /// Gets the default sessions directory path.
    ///
    /// - Linux: `~/.config/FuzzyLab/sessions/`
    /// - macOS: `~/Library/Application Support/FuzzyLab/sessions/`
    /// - Windows: `%APPDATA%\FuzzyLab\sessions\`
    fn default_sessions_dir() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("sessions"))
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system locations
    #[serde(default)]
    pub paths: PathConfig,
    /// Inference engine settings
    #[serde(default)]
    pub engine: EngineSettings,
    /// HTTP API settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/FuzzyLab/`
    /// - macOS: `~/Library/Application Support/FuzzyLab/`
    /// - Windows: `%APPDATA%\FuzzyLab\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config.toml file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location, or defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, or defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using an atomic write (temp file + rename).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");

        // Write to temp file
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.engine.fuzzify_resolution < 2 {
            anyhow::bail!(
                "engine.fuzzify_resolution must be at least 2, got {}",
                self.engine.fuzzify_resolution
            );
        }
        if self.engine.aggregate_resolution < 2 {
            anyhow::bail!(
                "engine.aggregate_resolution must be at least 2, got {}",
                self.engine.aggregate_resolution
            );
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be non-zero");
        }
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }

        Ok(())
    }
}
