//! User report storage.

use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use tracing::info;

use crate::error::Result;
use crate::models::{NewReport, Report};

#[derive(Debug, FromRow)]
struct ReportRow {
    id: i64,
    word: String,
    page: Option<i64>,
    reason: String,
    description: String,
    timestamp: String,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            word: row.word,
            page: row.page,
            reason: row.reason,
            description: row.description,
            timestamp: row.timestamp,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, report: &NewReport) -> Result<i64> {
        let id = sqlx::query(
            r#"
            INSERT INTO reports (word, page, reason, description, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&report.word)
        .bind(report.page)
        .bind(report.reason.as_str())
        .bind(&report.description)
        .bind(&report.timestamp)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(id, word = %report.word, reason = %report.reason, "Saved report");
        Ok(id)
    }

    /// All reports, newest first.
    pub async fn list(&self) -> Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, word, page, reason, description, timestamp
            FROM reports
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_in_memory;
    use crate::models::ReportReason;

    fn report(word: &str, timestamp: &str) -> NewReport {
        NewReport {
            word: word.to_string(),
            page: Some(42),
            reason: ReportReason::Typo,
            description: String::new(),
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let repo = ReportRepository::new(connect_in_memory().await.unwrap());
        repo.create(&report("old", "2024-01-01T00:00:00Z")).await.unwrap();
        repo.create(&report("new", "2025-06-01T00:00:00Z")).await.unwrap();

        let reports = repo.list().await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].word, "new");
        assert_eq!(reports[0].reason, "typo");
        assert_eq!(reports[1].page, Some(42));
    }
}
