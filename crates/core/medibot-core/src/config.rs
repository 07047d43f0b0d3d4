//! Configuration management and environment variable loading

use crate::{MediBotError, Result};
use std::env;
use std::path::Path;

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:medibot.db";

/// Default number of past turns handed to the chat service
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Default chat model name passed through to the collaborator
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Load environment variables from .env file
///
/// Missing `.env` is not an error; the process environment is used as-is.
///
/// # Example
///
/// ```no_run
/// use medibot_core::load_env;
///
/// load_env().ok();
/// let url = std::env::var("MEDIBOT_DATABASE_URL").unwrap_or_default();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(MediBotError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(MediBotError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(_) => {
            tracing::info!("Loaded environment from: {}", path.as_ref().display());
            Ok(())
        }
        Err(e) => Err(MediBotError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Explicit configuration handed to every collaborator at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediBotConfig {
    /// sqlx connection URL for the profile/history store
    pub database_url: String,
    /// How many past turns are included in a chat prompt
    pub history_limit: usize,
    /// Upper bound on pooled store connections
    pub max_connections: u32,
    /// Model name forwarded to the chat collaborator
    pub chat_model: String,
}

impl Default for MediBotConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_connections: 5,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl MediBotConfig {
    /// Build configuration from `MEDIBOT_*` environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            database_url: get_env_or("MEDIBOT_DATABASE_URL", &defaults.database_url),
            history_limit: get_env_int("MEDIBOT_HISTORY_LIMIT", defaults.history_limit),
            max_connections: get_env_int("MEDIBOT_DB_MAX_CONNECTIONS", defaults.max_connections),
            chat_model: get_env_or("MEDIBOT_CHAT_MODEL", &defaults.chat_model),
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the database URL
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Override the history window
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Reject values the store and pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(MediBotError::config("database_url must not be empty"));
        }
        if self.history_limit == 0 {
            return Err(MediBotError::config("history_limit must be at least 1"));
        }
        if self.max_connections == 0 {
            return Err(MediBotError::config("max_connections must be at least 1"));
        }
        Ok(())
    }
}
