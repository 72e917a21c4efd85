//! Configuration management for superthread-mcp.
//!
//! Handles loading and saving configuration from TOML files.
//! Config files are stored in platform-specific locations:
//!
//! - **macOS/Linux**: `~/.config/superthread-mcp/config.toml`
//! - **Windows**: `%APPDATA%\superthread-mcp\config.toml`
//!
//! Environment variables (`HOST`, `PORT`, `PUBLIC_URL`, `SUPERTHREAD_API_URL`,
//! `SUPERTHREAD_TOKEN`) override values from the file.
//!
//! # Example
//!
//! ```ignore
//! use superthread_core::config::Config;
//!
//! let mut config = Config::load()?;
//! config.apply_env()?;
//!
//! config.set("server.port", "9000")?;
//! config.save()?;
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "superthread-mcp";

/// Default Superthread REST API URL.
pub const DEFAULT_API_URL: &str = "https://api.superthread.com/v1";

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8787;

// =============================================================================
// Configuration structures
// =============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream API settings
    #[serde(default)]
    pub superthread: SuperthreadConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL, used in OAuth discovery documents.
    /// Derived from the request `Host` header when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

/// Superthread API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuperthreadConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Personal access token used when a request carries no
    /// `Authorization` header, and by the stdio transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

impl Default for SuperthreadConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            token: None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

// =============================================================================
// Config implementation
// =============================================================================

impl Config {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location.
    ///
    /// Returns a default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default config if the file doesn't exist.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        debug!(path = ?path, "Saving config");

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        info!(path = ?path, "Config saved successfully");
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = [
            ("HOST", "server.host"),
            ("PORT", "server.port"),
            ("PUBLIC_URL", "server.public_url"),
            ("SUPERTHREAD_API_URL", "superthread.base_url"),
            ("SUPERTHREAD_TOKEN", "superthread.token"),
        ];

        for (var, key) in vars {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                debug!(var = var, key = key, "Applying environment override");
                self.set(key, &value)?;
            }
        }

        Ok(())
    }

    /// The fallback token, if one is configured and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.superthread
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    /// Copy of this config that is safe to print.
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        if let Some(token) = config.superthread.token.as_mut() {
            *token = mask_token(token);
        }
        config
    }

    /// Set a configuration value by key path.
    ///
    /// Key format: `section.field` (e.g., `server.port`, `superthread.token`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = split_key(key)?;

        match section {
            "server" => match field {
                "host" => self.server.host = value.to_string(),
                "port" => {
                    self.server.port = value.parse().map_err(|_| {
                        Error::Config(format!("Invalid port '{}': expected 0-65535", value))
                    })?
                }
                "public_url" | "url" => self.server.public_url = Some(value.to_string()),
                _ => {
                    return Err(Error::Config(format!(
                        "Unknown server config field: {}",
                        field
                    )))
                }
            },
            "superthread" => match field {
                "base_url" | "url" => self.superthread.base_url = value.to_string(),
                "token" => self.superthread.token = Some(value.to_string()),
                _ => {
                    return Err(Error::Config(format!(
                        "Unknown superthread config field: {}",
                        field
                    )))
                }
            },
            _ => return Err(Error::Config(format!("Unknown config section: {}", section))),
        }

        Ok(())
    }

    /// Get a configuration value by key path.
    ///
    /// Key format: `section.field` (e.g., `server.port`, `superthread.token`)
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let (section, field) = split_key(key)?;

        match section {
            "server" => match field {
                "host" => Ok(Some(self.server.host.clone())),
                "port" => Ok(Some(self.server.port.to_string())),
                "public_url" | "url" => Ok(self.server.public_url.clone()),
                _ => Err(Error::Config(format!(
                    "Unknown server config field: {}",
                    field
                ))),
            },
            "superthread" => match field {
                "base_url" | "url" => Ok(Some(self.superthread.base_url.clone())),
                "token" => Ok(self.superthread.token.clone()),
                _ => Err(Error::Config(format!(
                    "Unknown superthread config field: {}",
                    field
                ))),
            },
            _ => Err(Error::Config(format!("Unknown config section: {}", section))),
        }
    }
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    match key.split_once('.') {
        Some((section, field)) if !field.contains('.') => Ok((section, field)),
        _ => Err(Error::Config(format!(
            "Invalid config key '{}'. Expected format: section.field",
            key
        ))),
    }
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

// =============================================================================
// Tests
// =============================================================================
