//! CLI argument definitions using clap
//!
//! Commands:
//! - clientdesk serve
//! - clientdesk init-schema
//!
//! Every option can also be set through the environment.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::http_server::HttpServerConfig;
use crate::store::StoreConfig;

/// clientdesk - customer and employee records
#[derive(Parser, Debug)]
#[command(name = "clientdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        http: HttpArgs,
    },

    /// Create any missing tables and exit
    InitSchema,
}

/// Store connection options
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost", global = true)]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 3306, global = true)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "root", global = true)]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "DB_DATABASE", global = true)]
    pub db_database: Option<String>,

    /// Full connection URL, overrides the individual DB_* options
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,

    /// Connection pool size
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 1, global = true)]
    pub max_connections: u32,

    /// Seconds to wait for a free connection
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub acquire_timeout_secs: u64,
}

impl StoreArgs {
    pub fn to_config(&self) -> StoreConfig {
        StoreConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_database.clone(),
            url: self.database_url.clone(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

/// HTTP bind options
#[derive(Args, Debug, Clone)]
pub struct HttpArgs {
    /// Host to bind to
    #[arg(long, env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(long, env = "HTTP_PORT", default_value_t = 3000)]
    pub port: u16,
}

impl HttpArgs {
    pub fn to_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_with_flags() {
        let cli = Cli::try_parse_from([
            "clientdesk",
            "--db-database",
            "crm",
            "--db-password",
            "secret",
            "serve",
            "--port",
            "8081",
        ])
        .unwrap();

        let store = cli.store.to_config();
        assert_eq!(store.database.as_deref(), Some("crm"));
        assert_eq!(store.password, "secret");
        assert_eq!(store.acquire_timeout, Duration::from_secs(30));

        match cli.command {
            Command::Serve { http } => {
                assert_eq!(http.to_config().socket_addr(), "0.0.0.0:8081");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_init_schema_with_url() {
        let cli = Cli::try_parse_from([
            "clientdesk",
            "init-schema",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::InitSchema));
        assert!(cli.store.to_config().is_in_memory());
    }
}
