//! PostgreSQL persistence layer for beacon.
//!
//! Model structs live in [`models`]; each carries its own query methods
//! generic over [`sqlx::PgExecutor`] so the same method runs against a
//! pool or inside an open transaction. Migrations are embedded at
//! compile time and applied at startup via [`run_migrations`].

pub mod error;
pub mod migrations;
pub mod models;

pub use error::DbError;
pub use migrations::run_migrations;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connect to PostgreSQL with the standard pool settings.
///
/// # Errors
///
/// Returns [`DbError::ConnectionFailed`] if the pool cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(DbError::ConnectionFailed)
}
