//! Bootstrap configuration loading
//!
//! Configuration file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `PRODTIME_CONFIG`
//! 3. Platform config file (`~/.config/prodtime/config.toml` on Linux)
//! 4. Compiled defaults (fallback)
//!
//! A missing or unreadable configuration file never stops startup: a warning
//! is logged and compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "PRODTIME_CONFIG";

/// Default HTTP port for the production-time service
pub const DEFAULT_PORT: u16 = 5740;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Address the HTTP service binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body (snapshots can be large)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve and load configuration, falling back to compiled defaults
    ///
    /// Errors reading or parsing a resolved file are reported through the
    /// returned [`ConfigSource`], not logged here: binaries need the
    /// configuration before tracing is initialized, and call
    /// [`ConfigSource::log`] once it is.
    pub fn load_with_source(cli_arg: Option<&Path>) -> (Self, ConfigSource) {
        let Some(path) = resolve_config_path(cli_arg) else {
            return (Self::default(), ConfigSource::Defaults);
        };

        match Self::load(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => (
                Self::default(),
                ConfigSource::Fallback {
                    path,
                    error: e.to_string(),
                },
            ),
        }
    }

    /// `address:port` string for binding the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file
    File(PathBuf),
    /// No file resolved; compiled defaults
    Defaults,
    /// A file resolved but could not be used; compiled defaults
    Fallback { path: PathBuf, error: String },
}

impl ConfigSource {
    /// Log the configuration origin (warning for fallbacks)
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Defaults => info!("No configuration file found, using compiled defaults"),
            ConfigSource::Fallback { path, error } => warn!(
                "Ignoring configuration file {}: {} - using compiled defaults",
                path.display(),
                error
            ),
        }
    }
}

/// Resolve which configuration file to read, if any
///
/// Command-line and environment paths are returned even if they do not
/// exist, so the caller can warn about them. The platform file is only
/// returned when present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config file
    default_config_path().filter(|path| path.exists())
}

/// File that `--save-config` writes to
///
/// The resolved configuration file when there is one, otherwise the
/// platform location (which may not exist yet).
pub fn save_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    resolve_config_path(cli_arg).or_else(default_config_path)
}

/// Platform configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("prodtime").join("config.toml"))
}

/// Write configuration atomically (temp file + rename)
///
/// Parent directories are created as needed.
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_name = target
        .file_name()
        .ok_or_else(|| Error::Config(format!("Invalid config path: {}", target.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = target.with_file_name(temp_name);

    std::fs::write(&temp_path, text)?;
    std::fs::rename(&temp_path, target)?;
    Ok(())
}
