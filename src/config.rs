use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub pool_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "tutor.db".into(),
            bind_addr: "127.0.0.1:5000".into(),
            pool_size: 8,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            pool_size: parse_var("DB_POOL_SIZE", defaults.pool_size)?,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}
