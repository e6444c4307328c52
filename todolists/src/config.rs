//! Configuration for the todolists binary.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use todolists_api::{DEFAULT_BASE_URL, DEFAULT_TASK_PAGE_SIZE};

/// An environment variable held a value that could not be used
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// A variable that must not be empty was empty
    #[error("{name} must not be empty")]
    Empty {
        /// Variable name
        name: &'static str,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (`TODOLISTS_API_URL`)
    pub api_url: String,
    /// Value of the `API-KEY` header (`TODOLISTS_API_KEY`)
    pub api_key: Option<String>,
    /// Tasks requested per page (`TODOLISTS_TASK_PAGE_SIZE`, default 10)
    pub task_page_size: u32,
    /// Per-request timeout in seconds (`TODOLISTS_REQUEST_TIMEOUT_SECS`, default 10)
    pub request_timeout_secs: u64,
    /// Log level when `RUST_LOG` is unset (`TODOLISTS_LOG_LEVEL`, default info)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds (`TODOLISTS_SHUTDOWN_TIMEOUT_SECS`, default 5)
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            task_page_size: DEFAULT_TASK_PAGE_SIZE,
            request_timeout_secs: 10,
            log_level: "info".to_string(),
            shutdown_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable is malformed or the API
    /// URL is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = match lookup("TODOLISTS_API_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    name: "TODOLISTS_API_URL",
                });
            },
            Some(url) => url,
            None => defaults.api_url,
        };

        Ok(Self {
            api_url,
            api_key: lookup("TODOLISTS_API_KEY").filter(|key| !key.is_empty()),
            task_page_size: number(&lookup, "TODOLISTS_TASK_PAGE_SIZE", defaults.task_page_size)?,
            request_timeout_secs: number(
                &lookup,
                "TODOLISTS_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            log_level: lookup("TODOLISTS_LOG_LEVEL").unwrap_or(defaults.log_level),
            shutdown_timeout_secs: number(
                &lookup,
                "TODOLISTS_SHUTDOWN_TIMEOUT_SECS",
                defaults.shutdown_timeout_secs,
            )?,
        })
    }

    /// Per-request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn number<F, N>(lookup: &F, name: &'static str, default: N) -> Result<N, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    N: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            name,
            value: raw,
        }),
    }
}
