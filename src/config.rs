//! Server configuration read from the environment

use std::env;
use std::num::NonZeroU64;
use thiserror::Error;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default per-client budget in requests per second
pub const DEFAULT_RATE_LIMIT: u64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SERVER_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("RATE_LIMIT must be a positive integer, got {0:?}")]
    InvalidRateLimit(String),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,

    /// Requests per second granted to each client
    pub rate_limit: NonZeroU64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rate_limit: NonZeroU64::new(DEFAULT_RATE_LIMIT).unwrap_or(NonZeroU64::MIN),
        }
    }
}

impl Config {
    /// Parse configuration from `SERVER_PORT` and `RATE_LIMIT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse configuration through an arbitrary variable lookup.
    ///
    /// Unset or empty variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(port) = lookup("SERVER_PORT").filter(|v| !v.is_empty()) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Some(limit) = lookup("RATE_LIMIT").filter(|v| !v.is_empty()) {
            config.rate_limit = limit
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidRateLimit(limit.clone()))?;
        }

        Ok(config)
    }
}
