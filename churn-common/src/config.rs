//! Configuration loading and settings resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority, clap also maps env vars here)
//! 2. TOML config file
//! 3. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "telco-churn";

/// Name of the artifact directory next to the executable
pub const DEFAULT_ARTIFACT_DIR_NAME: &str = "Model";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Directory holding the three artifact files
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Idle time after which a browser session is forgotten
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform location of the config file, if one can be determined
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Where the loaded config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the default location
    Defaults,
}

impl ConfigSource {
    /// Report the source. Call once tracing is initialized.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Defaults => warn!("No config file found, using defaults"),
        }
    }
}

/// Load the TOML config.
///
/// An explicitly requested file must exist. The default location is
/// optional: when absent the defaults are used. Nothing is logged here since
/// this runs before the subscriber exists; callers log the returned source.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok((TomlConfig::default(), ConfigSource::Defaults)),
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    Ok((config, ConfigSource::File(path)))
}

/// Artifact directory next to the running executable
pub fn default_artifact_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_ARTIFACT_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR_NAME))
}

/// Values supplied on the command line (or their env var equivalents)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub artifact_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub artifact_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub session_ttl: Duration,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(overrides: Overrides, toml: TomlConfig) -> Self {
        let artifact_dir = overrides
            .artifact_dir
            .or(toml.artifact_dir)
            .unwrap_or_else(default_artifact_dir);

        Self {
            artifact_dir,
            host: overrides
                .host
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            session_ttl: Duration::from_secs(
                toml.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ),
            log_level: toml.logging.level,
        }
    }

    /// Socket address string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
