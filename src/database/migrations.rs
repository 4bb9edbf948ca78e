//! Database Migrations
//!
//! Handles schema creation and versioned migrations.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::info;

use crate::error::{DictionaryError, Result};

/// Current database schema version
const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version = current_version(pool).await?;
    info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for version in (current_version + 1)..=SCHEMA_VERSION {
        run_migration(pool, version).await?;
    }
    Ok(())
}

async fn current_version(pool: &SqlitePool) -> Result<i32> {
    let row = sqlx::query("SELECT MAX(version) AS version FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(row
        .and_then(|row| row.try_get::<Option<i32>, _>("version").ok().flatten())
        .unwrap_or(0))
}

async fn run_migration(pool: &SqlitePool, version: i32) -> Result<()> {
    let (name, sql) = match version {
        1 => ("words_table", MIGRATION_V1),
        2 => ("reports_table", MIGRATION_V2),
        other => {
            return Err(DictionaryError::Migration(format!(
                "no migration defined for version {other}"
            )))
        }
    };

    info!(version, name, "Applying migration");
    let mut tx = pool.begin().await?;
    sqlx::raw_sql(sql).execute(&mut *tx).await?;
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(version)
        .bind(name)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

const MIGRATION_V1: &str = r#"
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL,
    normalized_word TEXT NOT NULL,
    meaning TEXT,
    meaning_tr TEXT,
    full_entry_text TEXT,
    full_entry_text_tr TEXT,
    etymology_type TEXT,
    variants TEXT,
    page INTEGER,
    skeleton TEXT,
    cross_reference TEXT
);
CREATE INDEX IF NOT EXISTS idx_words_normalized_word ON words(normalized_word);
CREATE INDEX IF NOT EXISTS idx_words_etymology_type ON words(etymology_type);
"#;

const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL,
    page INTEGER,
    reason TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reports_timestamp ON reports(timestamp);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_in_memory;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, SCHEMA_VERSION as i64);
    }
}
