//! Configuration management for ertdrive.
//!
//! Provides TOML-based configuration with platform-standard paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/ertdrive/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Background device watcher settings
    pub watch: WatchConfig,
    /// Wallet file discovery settings
    pub scan: ScanConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides, then validate.
    ///
    /// Supports the following environment variables:
    /// - `ERTDRIVE_HOST`: Override listener address
    /// - `ERTDRIVE_PORT`: Override listener port
    /// - `ERTDRIVE_WATCH_ENABLED`: Override watcher enabled status (true/false)
    /// - `ERTDRIVE_WATCH_INTERVAL_SECS`: Override watcher poll interval
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that fail to parse are ignored and the existing value is kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ERTDRIVE_HOST") {
            if let Ok(host) = val.parse() {
                self.server.host = host;
                tracing::debug!("Override server.host from env: {}", host);
            }
        }

        if let Some(val) = lookup("ERTDRIVE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
                tracing::debug!("Override server.port from env: {}", port);
            }
        }

        if let Some(val) = lookup("ERTDRIVE_WATCH_ENABLED") {
            if let Ok(enabled) = val.parse() {
                self.watch.enabled = enabled;
                tracing::debug!("Override watch.enabled from env: {}", enabled);
            }
        }

        if let Some(val) = lookup("ERTDRIVE_WATCH_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                self.watch.interval_secs = secs;
                tracing::debug!("Override watch.interval_secs from env: {}", secs);
            }
        }
    }

    /// Reject values the agent cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "must be non-zero"));
        }
        if self.watch.interval_secs == 0 {
            return Err(invalid("watch.interval_secs", "must be at least 1"));
        }
        if self.scan.max_depth == 0 {
            return Err(invalid("scan.max_depth", "must be at least 1"));
        }
        Ok(())
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| invalid("config_path", "no parent directory"))?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses platform base directories: `~/.config/ertdrive/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "ertdrive", "ertdrive").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (all interfaces by default)
    pub host: IpAddr,
    /// TCP port
    pub port: u16,
}

impl ServerConfig {
    /// Socket address the listener binds to.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5005,
        }
    }
}

/// Background device watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Start the watcher at startup
    pub enabled: bool,
    /// Seconds between polls
    pub interval_secs: u64,
}

impl WatchConfig {
    /// Poll interval as a `Duration`.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 2,
        }
    }
}

/// Wallet file discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum directory depth below the mount point
    pub max_depth: usize,
    /// Files larger than this are never read
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_file_bytes: 16 * 1024 * 1024, // 16 MiB
        }
    }
}
