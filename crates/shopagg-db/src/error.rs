//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        deadline expired                    │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  DbError (this module)            DbError::Canceled                    │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  StorageError::Failed             StorageError::Canceled               │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  domain error (BillError, ...)    CoreError::Canceled                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shopagg_service::StorageError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Registering a taken login or email
    /// - Any UNIQUE index violation not absorbed by an upsert
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Bill for an unknown store or user
    /// - Line item for an unknown product or bill
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The query did not finish within the configured query timeout.
    #[error("Query canceled: deadline exceeded")]
    Canceled,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Repositories answer storer calls with this conversion.
impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Canceled => StorageError::Canceled,
            other => StorageError::Failed(other.to_string()),
        }
    }
}
