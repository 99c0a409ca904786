//! Configuration management for Portable Cloud
//!
//! Settings are loaded once at startup from built-in defaults, an optional
//! `config.toml`, and `PORTABLE_CLOUD_*` environment overrides, in that order.
//! The resulting [`ServerConfig`] is passed explicitly to the components that
//! need it; nothing reads configuration globally.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `PORTABLE_CLOUD_PORT=8080`.
pub const ENV_PREFIX: &str = "PORTABLE_CLOUD";

/// Config file looked up in the working directory (any supported extension).
pub const DEFAULT_CONFIG_NAME: &str = "config";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: i64 = 5000;
const DEFAULT_STORAGE_ROOT: &str = "data/uploads";
const DEFAULT_MAX_UPLOAD_SIZE_MB: i64 = 500;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the HTTP listener binds to (restart required)
    pub bind_address: String,

    /// Port for the HTTP listener (restart required)
    pub port: u16,

    /// Root directory every stored file lives under (restart required)
    pub storage_root: PathBuf,

    /// Largest accepted upload body, in MiB
    pub max_upload_size_mb: u64,

    /// Optional directory of front-end assets served under `/static`
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT as u16,
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            max_upload_size_mb: DEFAULT_MAX_UPLOAD_SIZE_MB as u64,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Load configuration from a named config file (if present) with environment overrides
    pub fn load_from(config_name: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", DEFAULT_PORT)?
            .set_default("storage_root", DEFAULT_STORAGE_ROOT)?
            .set_default("max_upload_size_mb", DEFAULT_MAX_UPLOAD_SIZE_MB)?
            .add_source(File::with_name(config_name).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration rooted at `storage_root`, everything else default
    pub fn with_storage_root(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.storage_root.as_os_str().is_empty() {
            return Err(ConfigError::Message("storage_root cannot be empty".into()));
        }

        if self.max_upload_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Maximum upload size in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }

    /// Creates the storage root if needed and returns its canonical absolute path
    pub fn prepare_storage_root(&self) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.storage_root)?;
        self.storage_root.canonicalize()
    }

    /// Static asset directory, only when it exists on disk
    pub fn static_dir(&self) -> Option<&Path> {
        self.static_dir.as_deref().filter(|dir| dir.is_dir())
    }
}
