//! Configuration management for the Liber server

use config::{Config, ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the record files
    pub data_dir: String,
    pub items_file: String,
    pub patrons_file: String,
}

impl StorageConfig {
    pub fn items_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.items_file)
    }

    pub fn patrons_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.patrons_file)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix LIBER_)
            .add_source(
                Environment::with_prefix("LIBER")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override data directory from LIBER_DATA_DIR env var if present
            .set_override_option("storage.data_dir", env::var("LIBER_DATA_DIR").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            items_file: "items.txt".to_string(),
            patrons_file: "patrons.txt".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
