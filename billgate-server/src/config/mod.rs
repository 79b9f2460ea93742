//! Configuration loading: TOML file plus environment.

mod file;

pub use file::{FileConfig, NotifyConfig, ReminderConfig, ServerConfig};

use std::path::Path;

/// Errors while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),
}

/// Load and parse the configuration file.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Database connection string from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))
}

/// Redis connection string from the environment.
pub fn get_redis_url() -> Result<String, ConfigError> {
    std::env::var("REDIS_URL").map_err(|_| ConfigError::MissingEnv("REDIS_URL"))
}
