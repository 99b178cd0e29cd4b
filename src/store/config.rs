//! Store Configuration
//!
//! Connection parameters for the relational store. Values normally come from
//! the environment (`DB_HOST`, `DB_USER`, `DB_DATABASE`, `DB_PASSWORD`) via
//! the CLI layer; `DATABASE_URL` overrides the individual parts.

use std::fmt;
use std::time::Duration;

/// Store connection configuration
#[derive(Clone)]
pub struct StoreConfig {
    /// Database host (default: "localhost")
    pub host: String,

    /// Database port (default: 3306)
    pub port: u16,

    /// Database user (default: "root")
    pub user: String,

    /// Database password (default: empty)
    pub password: String,

    /// Database name
    pub database: Option<String>,

    /// Full connection URL, takes precedence over the parts above
    pub url: Option<String>,

    /// Pool size (default: 1, one shared connection)
    pub max_connections: u32,

    /// How long a request waits for a free connection
    pub acquire_timeout: Duration,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_user() -> String {
    "root".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3306,
            user: default_user(),
            password: String::new(),
            database: None,
            url: None,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl StoreConfig {
    /// Config for an explicit connection URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// In-memory SQLite store, used by tests and local experiments
    pub fn in_memory() -> Self {
        Self::with_url("sqlite::memory:")
    }

    /// Whether this config points at a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url
            .as_deref()
            .map(|url| url.starts_with("sqlite::memory:") || url.contains("mode=memory"))
            .unwrap_or(false)
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}
