//! Configuration management
//!
//! Settings are resolved in the following priority order:
//! 1. Environment variables (`BOOKWISE_*`)
//! 2. `bookwise.toml` configuration file
//! 3. Defaults

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Remote booking API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the booking API, e.g. `https://booking.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for administrative calls (optional; public booking
    /// endpoints work without it)
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Dashboard server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Main configuration for bookwise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Booking API client configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Dashboard server configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Build configuration from the environment alone.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides();
        if config.api.base_url.is_empty() {
            return Err(Error::Config("API base URL must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Load `bookwise.toml` if present, otherwise fall back to env/defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("BOOKWISE_CONFIG").unwrap_or_else(|_| "bookwise.toml".to_string());
        if Path::new(&path).exists() {
            tracing::debug!("Loading configuration from {}", path);
            Self::from_toml_file(&path)
        } else {
            Self::from_env()
        }
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BOOKWISE_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(token) = std::env::var("BOOKWISE_API_TOKEN") {
            self.api.token = Some(token);
        }
        if let Ok(timeout) = std::env::var("BOOKWISE_API_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.api.timeout_secs = secs;
            }
        }
        if let Ok(host) = std::env::var("BOOKWISE_DASHBOARD_HOST") {
            self.dashboard.host = host;
        }
        if let Ok(port) = std::env::var("BOOKWISE_DASHBOARD_PORT") {
            if let Ok(port) = port.parse() {
                self.dashboard.port = port;
            }
        }
    }
}
