//! Database configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the record database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (MySQL/TiDB, Postgres or SQLite)
    pub database_url: String,

    /// Maximum database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum idle connections kept warm
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Database connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Connection attempts before giving up
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Enable SQL query logging
    #[serde(default)]
    pub enable_sql_logging: bool,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// In-memory SQLite lives inside a single connection, so the pool must
    /// never open a second one or recycle the first.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.starts_with("sqlite::memory:")
            || self.database_url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_secs: default_connection_timeout(),
            connect_attempts: default_connect_attempts(),
            enable_sql_logging: false,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_connect_attempts() -> u32 {
    3
}
