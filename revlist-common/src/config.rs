//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a small TOML file. Each value is resolved in
//! priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or broken TOML file never stops startup; it is logged and the
//! lower-priority sources apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_ROOT_FOLDER: &str = "REVLIST_ROOT_FOLDER";
pub const ENV_VERIFY_URL: &str = "REVLIST_VERIFY_URL";
pub const ENV_VERIFY_API_KEY: &str = "REVLIST_VERIFY_API_KEY";

const DATABASE_FILE_NAME: &str = "revlist.db";

/// Bootstrap configuration as written in the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database file; defaults to `<root_folder>/revlist.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub verification: VerificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Payment verification endpoint settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_verify_endpoint")]
    pub endpoint: String,

    /// Bearer credential sent with each verification request
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 1 = single check, no re-polling of pending payments
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    #[serde(default = "default_poll_initial_backoff_ms")]
    pub poll_initial_backoff_ms: u64,

    #[serde(default = "default_poll_max_backoff_ms")]
    pub poll_max_backoff_ms: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_verify_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_initial_backoff_ms: default_poll_initial_backoff_ms(),
            poll_max_backoff_ms: default_poll_max_backoff_ms(),
        }
    }
}

impl VerificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
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

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5810
}

fn default_verify_endpoint() -> String {
    "http://127.0.0.1:54321/functions/v1/verify-payment".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_max_attempts() -> u32 {
    1
}

fn default_poll_initial_backoff_ms() -> u64 {
    1000
}

fn default_poll_max_backoff_ms() -> u64 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub server: ServerConfig,
    pub verification: VerificationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Resolve configuration from CLI overrides, environment, TOML and defaults
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match overrides.config_file.clone().or_else(default_config_file) {
            Some(path) => load_toml_or_default(&path),
            None => TomlConfig::default(),
        };

        Self::from_sources(overrides, toml_config)
    }

    /// Merge the already-loaded TOML layer with CLI and environment values
    pub fn from_sources(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        // Priority 1: CLI, 2: environment, 3: TOML, 4: compiled default
        let root_folder = overrides
            .root_folder
            .or_else(|| std::env::var(ENV_ROOT_FOLDER).ok().map(PathBuf::from))
            .or(toml_config.root_folder)
            .unwrap_or_else(default_root_folder);

        let database_path = toml_config
            .database_path
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME));

        let mut server = toml_config.server;
        if let Some(port) = overrides.port {
            server.port = port;
        }

        let mut verification = toml_config.verification;
        if let Ok(endpoint) = std::env::var(ENV_VERIFY_URL) {
            verification.endpoint = endpoint;
        }
        if let Ok(api_key) = std::env::var(ENV_VERIFY_API_KEY) {
            verification.api_key = Some(api_key);
        }

        let config = Self {
            root_folder,
            database_path,
            server,
            verification,
            logging: toml_config.logging,
        };
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would make the service unusable
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }
        if self.verification.timeout_secs == 0 {
            return Err(Error::Config(
                "verification.timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.verification.poll_max_attempts == 0 {
            return Err(Error::Config(
                "verification.poll_max_attempts must be at least 1".to_string(),
            ));
        }
        if self.verification.endpoint.trim().is_empty() {
            return Err(Error::Config(
                "verification.endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a TOML config file
pub fn load_toml(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Parse a TOML config file, falling back to defaults on any failure
pub fn load_toml_or_default(path: &Path) -> TomlConfig {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return TomlConfig::default();
    }

    match load_toml(path) {
        Ok(config) => {
            info!("Loaded configuration from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            TomlConfig::default()
        }
    }
}

/// `~/.config/revlist/config.toml` (platform equivalent elsewhere)
fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("revlist").join("config.toml"))
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("revlist"))
        .unwrap_or_else(|| PathBuf::from("./revlist_data"))
}
