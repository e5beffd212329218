//! Configuration management for ticketdesk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "ticketdesk";

/// Default records file name for the JSON backend.
const DATA_FILE_NAME: &str = "data.json";

/// Default devices file name for the JSON backend.
const DEVICES_FILE_NAME: &str = "devices.json";

/// Default database file name for the SQLite backend.
const DATABASE_FILE_NAME: &str = "ticketdesk.db";

/// Environment variable prefix.
const ENV_PREFIX: &str = "TICKETDESK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TICKETDESK_`, sections separated
///    by `__`, e.g. `TICKETDESK_SERVER__PORT=8080`)
/// 2. TOML config file at `~/.config/ticketdesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Record store configuration.
    pub store: StoreConfig,
    /// Dashboard view configuration.
    pub dashboard: DashboardConfig,
    /// API client configuration.
    pub client: ClientConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// How long browsers may cache CORS preflight answers.
    pub cors_max_age_secs: u64,
    /// Reject uploads containing records with blank required fields.
    pub require_fields: bool,
}

/// Which persistence backend holds the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Two JSON files on disk.
    #[default]
    Json,
    /// Process memory only.
    Memory,
    /// A SQLite database file.
    Sqlite,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Memory => write!(f, "memory"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Persistence backend.
    pub backend: Backend,
    /// Records file for the JSON backend.
    /// Defaults to `~/.local/share/ticketdesk/data.json`
    pub data_path: Option<PathBuf>,
    /// Devices file for the JSON backend.
    /// Defaults to `~/.local/share/ticketdesk/devices.json`
    pub devices_path: Option<PathBuf>,
    /// Database file for the SQLite backend.
    /// Defaults to `~/.local/share/ticketdesk/ticketdesk.db`
    pub database_path: Option<PathBuf>,
    /// Device names written into a fresh store.
    pub seed_devices: Vec<String>,
}

/// Dashboard view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Table rows per page.
    pub page_size: usize,
}

/// API client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the ticketdesk server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_max_age_secs: 60 * 60,
            require_fields: true,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_path: None,
            devices_path: None,
            database_path: None,
            seed_devices: default_seed_devices(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { page_size: 15 }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Device vocabulary for a fresh store.
fn default_seed_devices() -> Vec<String> {
    [
        "PC",
        "Laptop",
        "Printer",
        "Scanner",
        "Router",
        "Switch",
        "Access Point",
        "CCTV",
        "IP Phone",
        "Projector",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl StoreConfig {
    /// Records file path, resolving defaults if not set.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.data_path
            .clone()
            .unwrap_or_else(|| Config::default_data_dir().join(DATA_FILE_NAME))
    }

    /// Devices file path, resolving defaults if not set.
    #[must_use]
    pub fn devices_path(&self) -> PathBuf {
        self.devices_path
            .clone()
            .unwrap_or_else(|| Config::default_data_dir().join(DEVICES_FILE_NAME))
    }

    /// Database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| Config::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port must be greater than 0"));
        }

        if self.server.host.trim().is_empty() {
            return Err(invalid("server.host must not be empty"));
        }

        if self.dashboard.page_size == 0 {
            return Err(invalid("dashboard.page_size must be greater than 0"));
        }

        if self.store.seed_devices.is_empty() {
            return Err(invalid("store.seed_devices must list at least one device"));
        }

        let mut seen = HashSet::new();
        for device in &self.store.seed_devices {
            if device.trim().is_empty() {
                return Err(invalid("store.seed_devices contains a blank name"));
            }
            if !seen.insert(device.as_str()) {
                return Err(invalid(format!(
                    "store.seed_devices lists '{device}' more than once"
                )));
            }
        }

        let url = &self.client.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(format!(
                "client.base_url must start with http:// or https://, got '{url}'"
            )));
        }

        if self.client.timeout_secs == 0 {
            return Err(invalid("client.timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    /// The `host:port` the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// CORS preflight cache lifetime as a Duration.
    #[must_use]
    pub fn cors_max_age(&self) -> Duration {
        Duration::from_secs(self.server.cors_max_age_secs)
    }

    /// Client request timeout as a Duration.
    #[must_use]
    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}
