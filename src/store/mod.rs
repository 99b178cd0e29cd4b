//! # Store
//!
//! Owns the connection pool to the relational store. A `Store` is created
//! once at startup and handed to every request handler; it is cheap to
//! clone (the pool is reference counted).
//!
//! Two backends are compiled in through `sqlx::Any`:
//! - MySQL / MariaDB for deployments
//! - SQLite, mostly `sqlite::memory:` for tests
//!
//! Both use `?` positional placeholders, so every statement in the record
//! layer runs unchanged against either.

mod config;
mod errors;
mod schema;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};

use std::str::FromStr;

use sqlx::any::{install_default_drivers, AnyConnectOptions, AnyPoolOptions};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{AnyConnection, AnyPool, ConnectOptions};
use tracing::info;

use crate::records::{CustomerRepository, EmployeeRepository};

/// Store backend, derived from the connection URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    /// Map a URL scheme to a compiled-in backend
    pub fn from_scheme(scheme: &str) -> StoreResult<Self> {
        match scheme {
            "mysql" | "mariadb" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(StoreError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::MySql => "mysql",
            Backend::Sqlite => "sqlite",
        }
    }

    fn last_insert_id_sql(&self) -> &'static str {
        match self {
            Backend::MySql => "SELECT CAST(LAST_INSERT_ID() AS SIGNED)",
            Backend::Sqlite => "SELECT last_insert_rowid()",
        }
    }

    /// Key generated by the latest insert on `conn`
    ///
    /// The `Any` driver only reports it for MySQL, so it is read back with
    /// a query on the connection that ran the insert.
    pub async fn last_insert_id(&self, conn: &mut AnyConnection) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(self.last_insert_id_sql())
            .fetch_one(&mut *conn)
            .await
    }
}

/// Shared handle to the relational store
#[derive(Debug, Clone)]
pub struct Store {
    pool: AnyPool,
    backend: Backend,
}

impl Store {
    /// Open the pool described by `config`
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        install_default_drivers();

        let options = connect_options(config)?;
        let backend = Backend::from_scheme(options.database_url.scheme())?;

        let mut pool_options = AnyPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(config.acquire_timeout);

        // Every new connection to `:memory:` is a fresh, empty database.
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        info!(
            backend = backend.as_str(),
            max_connections = config.max_connections.max(1),
            "store connected"
        );

        Ok(Self { pool, backend })
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Customer record access
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone(), self.backend)
    }

    /// Employee record access
    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone(), self.backend)
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(config: &StoreConfig) -> StoreResult<AnyConnectOptions> {
    if let Some(url) = &config.url {
        return AnyConnectOptions::from_str(url).map_err(StoreError::Connect);
    }

    let database = config
        .database
        .as_deref()
        .ok_or(StoreError::MissingDatabase)?;

    // Let the MySQL driver build (and percent-encode) the URL.
    let mysql = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(database);

    AnyConnectOptions::from_url(&mysql.to_url_lossy()).map_err(StoreError::Connect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_scheme() {
        assert_eq!(Backend::from_scheme("mysql").unwrap(), Backend::MySql);
        assert_eq!(Backend::from_scheme("mariadb").unwrap(), Backend::MySql);
        assert_eq!(Backend::from_scheme("sqlite").unwrap(), Backend::Sqlite);
        assert!(matches!(
            Backend::from_scheme("postgres"),
            Err(StoreError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_options_require_database() {
        let config = StoreConfig::default();
        assert!(matches!(
            connect_options(&config),
            Err(StoreError::MissingDatabase)
        ));
    }

    #[test]
    fn test_options_from_parts() {
        let config = StoreConfig {
            host: "db.internal".to_string(),
            user: "crm".to_string(),
            password: "p@ss word".to_string(),
            database: Some("crm".to_string()),
            ..Default::default()
        };
        let options = connect_options(&config).unwrap();
        assert_eq!(options.database_url.scheme(), "mysql");
        assert_eq!(options.database_url.host_str(), Some("db.internal"));
        assert_eq!(options.database_url.username(), "crm");
        assert_eq!(options.database_url.path(), "/crm");
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let store = Store::connect(&StoreConfig::in_memory()).await.unwrap();
        assert_eq!(store.backend(), Backend::Sqlite);
        store.close().await;
    }

    #[tokio::test]
    async fn test_last_insert_id_follows_each_insert() {
        let store = Store::connect(&StoreConfig::in_memory()).await.unwrap();
        store.apply_schema().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        let mut ids = Vec::new();
        for name in ["Acme", "Globex"] {
            sqlx::query("INSERT INTO Companies (name) VALUES (?)")
                .bind(name)
                .execute(&mut *conn)
                .await
                .unwrap();
            ids.push(store.backend().last_insert_id(&mut conn).await.unwrap());
        }

        assert_eq!(ids.len(), 2);
        assert!(ids[0] > 0);
        assert!(ids[1] > ids[0]);

        let name: String = sqlx::query_scalar("SELECT name FROM Companies WHERE company_id = ?")
            .bind(ids[1])
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(name, "Globex");
    }
}
