//! Application settings loaded from `config.toml`.
//!
//! The file is optional. When it is missing the server listens on
//! `127.0.0.1:5000` and seeds every department in the catalog.

use crate::entities::DepartmentName;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Department codes to create on start; `None` means all of them
    #[serde(default)]
    pub departments: Option<Vec<String>>,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Resolves the listen address.
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!(
                    "Invalid listen address {}:{}: {e}",
                    self.server.host, self.server.port
                ),
            })
    }

    /// Department names to seed, validated against the fixed catalog.
    pub fn seed_departments(&self) -> Result<Vec<DepartmentName>> {
        let Some(codes) = &self.departments else {
            return Ok(<DepartmentName as sea_orm::Iterable>::iter().collect());
        };
        codes
            .iter()
            .map(|code| {
                DepartmentName::parse(code).ok_or_else(|| Error::Config {
                    message: format!("Unknown department code in config.toml: {code}"),
                })
            })
            .collect()
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads `./config.toml`, falling back to defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::info!("No config.toml found, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(path)
}
