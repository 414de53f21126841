//! # Database Error Types
//!
//! Error types for store and transaction operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      ValidationError / CoreError           │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← categorized, carries ErrorKind                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in toko-api) ← status code + envelope                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An error raised while a transaction is open rolls it back before it
//! reaches the caller: the `sqlx::Transaction` guard is dropped uncommitted.

use thiserror::Error;
use toko_core::{CoreError, ErrorKind, ValidationError};

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The addressed record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A record referenced BY the request does not exist
    /// (customer of a sale, product of a line item).
    #[error("{entity} not found: {id}")]
    MissingReference { entity: String, id: String },

    /// Primary key / unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Delete blocked by dependent rows.
    #[error("Cannot delete {entity} {id}: still referenced by {dependent}")]
    ReferentialConflict {
        entity: String,
        id: String,
        dependent: String,
    },

    /// Foreign key constraint raised by SQLite itself.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Input rejected before touching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin/commit failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a MissingReference error.
    pub fn missing_reference(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::MissingReference {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a ReferentialConflict error.
    pub fn referenced(
        entity: impl Into<String>,
        id: impl Into<String>,
        dependent: impl Into<String>,
    ) -> Self {
        DbError::ReferentialConflict {
            entity: entity.into(),
            id: id.into(),
            dependent: dependent.into(),
        }
    }

    /// Machine-checkable category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::NotFound { .. } | DbError::MissingReference { .. } => ErrorKind::NotFound,
            DbError::UniqueViolation { .. } => ErrorKind::DuplicateKey,
            DbError::ReferentialConflict { .. } => ErrorKind::ReferentialConflict,
            DbError::Validation(_) => ErrorKind::Validation,
            DbError::ForeignKeyViolation { .. }
            | DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::TransactionFailed(_)
            | DbError::PoolExhausted
            | DbError::Internal(_) => ErrorKind::TransactionFailure,
        }
    }
}

/// Pure-domain failures surfacing inside a store operation.
///
/// Unknown ids found while composing a sale are references, not the
/// addressed record.
impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(code) => DbError::missing_reference("Product", code),
            CoreError::CustomerNotFound(id) => DbError::missing_reference("Customer", id),
            CoreError::SaleNotFound(id) => DbError::not_found("Sale", id),
            CoreError::Validation(v) => DbError::Validation(v),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
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

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
