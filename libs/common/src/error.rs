//! Custom error types for the common library
//!
//! This module defines the store-level error taxonomy shared by every
//! repository in the workspace.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while creating the tables
    #[error("Database schema error: {0}")]
    Schema(#[source] SqlxError),

    /// A write collided with a unique constraint
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify an error returned by a query
    ///
    /// Unique-constraint violations get their own variant so the HTTP layer
    /// can answer them with a conflict instead of a server error.
    pub fn query(err: SqlxError) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return DatabaseError::UniqueViolation { constraint };
            }
        }

        DatabaseError::Query(err)
    }

    /// Whether this error was caused by a duplicate unique value
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
