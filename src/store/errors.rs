//! Store bootstrap errors

use thiserror::Error;

/// Result type for store bootstrap
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while opening the store or applying the DDL bootstrap
#[derive(Debug, Error)]
pub enum StoreError {
    /// Neither a database URL nor a database name was configured
    #[error("no database configured: set DATABASE_URL or DB_DATABASE")]
    MissingDatabase,

    /// URL scheme is not one of the compiled-in drivers
    #[error("unsupported database URL scheme: {0}")]
    UnsupportedScheme(String),

    /// Connection options could not be built or the pool could not connect
    #[error("failed to connect to store: {0}")]
    Connect(#[source] sqlx::Error),

    /// A DDL statement failed
    #[error("failed to apply schema: {0}")]
    Schema(#[source] sqlx::Error),
}
