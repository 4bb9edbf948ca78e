//! Database layer
//!
//! SQLite via sqlx. All SQL is runtime-checked (`sqlx::query`, not
//! `sqlx::query!`) so building never needs a live database.

pub mod migrations;
pub mod report_repository;
pub mod word_repository;

pub use report_repository::ReportRepository;
pub use word_repository::{EntryRow, NormalizationRepair, WordRepository};

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Rows written per transaction in batch operations.
pub const BATCH_SIZE: usize = 50;

/// Open a pool for the configured database and apply pending migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    info!("Database connection established");

    migrations::run_migrations(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
///
/// Each SQLite in-memory connection is its own database, so the pool is
/// pinned to one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrations::run_migrations(&pool).await?;
    Ok(pool)
}
