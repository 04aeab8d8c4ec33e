use std::path::PathBuf;

use thiserror::Error;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::query::{SortKey, SortOrder, SortState};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Export
    pub data_path: PathBuf,

    // Query defaults
    pub page_size: usize,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Export
            data_path: PathBuf::from(env_or_default("DATA_PATH", "./data/your_posts.json")),

            // Query defaults
            page_size: parse_env_usize("PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            sort_key: parse_sort_key(&env_or_default("SORT_BY", "timestamp"))?,
            sort_order: parse_sort_order(&env_or_default("SORT_ORDER", "asc"))?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "PAGE_SIZE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "DATA_PATH".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn sort(&self) -> SortState {
        SortState::new(self.sort_key, self.sort_order)
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_sort_key(value: &str) -> Result<SortKey, ConfigError> {
    SortKey::parse(value).ok_or_else(|| ConfigError::InvalidValue {
        name: "SORT_BY".to_string(),
        message: format!("must be 'timestamp', 'created_time', 'text' or 'title', got '{value}'"),
    })
}

fn parse_sort_order(value: &str) -> Result<SortOrder, ConfigError> {
    SortOrder::parse(value).ok_or_else(|| ConfigError::InvalidValue {
        name: "SORT_ORDER".to_string(),
        message: format!("must be 'asc' or 'desc', got '{value}'"),
    })
}
