//! Store configuration loading and representation.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `STOCKWIDGET_DB_PATH` | SQLite file, or `:memory:` | `{data_dir}/stockwidget/inventory.db` |
//! | `STOCKWIDGET_DB_MAX_CONNECTIONS` | Pool size (>= 1) | `4` |

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub const DB_PATH_ENV: &str = "STOCKWIDGET_DB_PATH";
pub const DB_MAX_CONNECTIONS_ENV: &str = "STOCKWIDGET_DB_MAX_CONNECTIONS";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const APP_DIR: &str = "stockwidget";
const DB_FILE: &str = "inventory.db";
const MEMORY: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "failed to resolve an app data directory (tried data_dir() and home_dir()/.local/share)"
    )]
    NoDataDir,

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where the product table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private in-memory database; gone when the store is closed.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// An in-memory database lives on exactly one connection, so the pool is
    /// pinned to a single connection that is never recycled.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            max_connections: 1,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) if path.trim() == MEMORY => Self::in_memory(),
            Some(path) => Self::file(path.trim()),
            None => Self::file(default_db_path()?),
        };

        if config.location != StoreLocation::Memory {
            if let Some(raw) = lookup(DB_MAX_CONNECTIONS_ENV) {
                let max = raw
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: DB_MAX_CONNECTIONS_ENV,
                        value: raw.clone(),
                        reason: "expected a positive integer".to_string(),
                    })?;
                config.max_connections = max;
            }
        }

        Ok(config)
    }

    /// Directory holding the database file, if file-backed.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.location {
            StoreLocation::File(path) => path.parent(),
            StoreLocation::Memory => None,
        }
    }

    pub(crate) fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        let options = match &self.location {
            StoreLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
            StoreLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")?,
        };
        Ok(options.busy_timeout(self.busy_timeout))
    }

    pub(crate) fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().max_connections(self.max_connections.max(1));
        match self.location {
            StoreLocation::File(_) => options,
            StoreLocation::Memory => options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        }
    }
}

/// Resolve the default database path: `{app_data_dir}/stockwidget/inventory.db`.
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;

    dir.push(APP_DIR);
    dir.push(DB_FILE);
    Ok(dir)
}
