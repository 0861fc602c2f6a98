//! Error types for the beacon-db crate.

use thiserror::Error;

/// Database operation errors.
///
/// Wraps `sqlx` errors with enough context to tell connection problems,
/// migration problems, and query problems apart at the call site.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or acquire a database connection.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A database migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A database query failed to execute.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),
}

impl DbError {
    /// Check if this error indicates a connection problem.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_))
    }

    /// Check if this error indicates a migration problem.
    #[must_use]
    pub fn is_migration_error(&self) -> bool {
        matches!(self, DbError::MigrationFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = DbError::ConnectionFailed(sqlx::Error::PoolTimedOut);
        assert!(err.is_connection_error());
        assert!(!err.is_migration_error());

        let err = DbError::QueryFailed(sqlx::Error::RowNotFound);
        assert!(!err.is_connection_error());
    }

    #[test]
    fn test_error_display() {
        let err = DbError::QueryFailed(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Query failed:"));
    }
}
