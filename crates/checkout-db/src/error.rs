//! # Catalog Store Errors
//!
//! ```text
//!   sqlx::Error ───────────┐
//!   MigrateError ──────────┼──► DbError ──┬──► KioskError::Database (startup stops)
//!   ValidationError ───────┘              └──► ImportRowError message (import goes on)
//! ```

use checkout_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} {id} is not in the catalog")]
    NotFound { entity: String, id: String },

    /// Another row already holds this value (product id).
    #[error("{field} '{value}' is already in the catalog")]
    UniqueViolation { field: String, value: String },

    /// Rejected before reaching SQLite.
    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    /// A CHECK in the schema fired (negative price, unknown import source).
    #[error("Rejected by schema: {0}")]
    ConstraintViolation(String),

    /// File missing permissions, disk full, or the pool was closed.
    #[error("Cannot open catalog database: {0}")]
    ConnectionFailed(String),

    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    #[error("Catalog query failed: {0}")]
    QueryFailed(String),

    #[error("No free catalog connection")]
    PoolExhausted,

    #[error("Catalog store error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// SQLite reports constraint failures only as message text, e.g.
/// `UNIQUE constraint failed: products.id`; the offending value is filled
/// in by the repository, which knows it.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if let Some(column) = message.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::duplicate(column, "?")
                } else if message.starts_with("CHECK constraint failed") {
                    DbError::ConstraintViolation(message.to_string())
                } else {
                    DbError::QueryFailed(message.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
