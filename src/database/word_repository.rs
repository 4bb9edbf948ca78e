//! Dictionary entry storage - search, lookup and administrative batch writes.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{parse_variants, DictionaryEntry, NewEntry};
use crate::normalize::normalize;
use crate::query::{SearchFilter, ENTRY_COLUMNS};

use super::BATCH_SIZE;

/// Raw `words` row; `variants` is still the stored TEXT.
#[derive(Debug, Clone, FromRow)]
pub struct EntryRow {
    pub id: i64,
    pub word: String,
    pub normalized_word: String,
    pub meaning: Option<String>,
    pub meaning_tr: Option<String>,
    pub full_entry_text: Option<String>,
    pub full_entry_text_tr: Option<String>,
    pub etymology_type: Option<String>,
    pub variants: Option<String>,
    pub page: Option<i64>,
    pub skeleton: Option<String>,
    pub cross_reference: Option<String>,
}

impl From<EntryRow> for DictionaryEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            variants: parse_variants(row.variants.as_deref()),
            id: row.id,
            word: row.word,
            normalized_word: row.normalized_word,
            meaning: row.meaning,
            meaning_tr: row.meaning_tr,
            full_entry_text: row.full_entry_text,
            full_entry_text_tr: row.full_entry_text_tr,
            etymology_type: row.etymology_type,
            page: row.page,
            skeleton: row.skeleton,
            cross_reference: row.cross_reference,
        }
    }
}

/// Outcome of re-deriving every `normalized_word` from its `word`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizationRepair {
    pub processed: usize,
    pub changed: usize,
}

/// Repository for the `words` table
#[derive(Clone, Debug)]
pub struct WordRepository {
    pool: SqlitePool,
}

impl WordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a compiled search; returns the page of entries and the total match count.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DictionaryEntry>, i64)> {
        let count_sql = filter.count_sql();
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in filter.params() {
            count_query = count_query.bind(param);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let select_sql = filter.select_sql();
        let mut select_query = sqlx::query_as::<_, EntryRow>(&select_sql);
        for param in filter.params() {
            select_query = select_query.bind(param);
        }
        let rows = select_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            clause = filter.clause(),
            total,
            returned = rows.len(),
            "Search executed"
        );
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<DictionaryEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM words WHERE id = ?");
        let row = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// The entry at position `offset` in id order.
    pub async fn get_by_offset(&self, offset: i64) -> Result<Option<DictionaryEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM words ORDER BY id ASC LIMIT 1 OFFSET ?");
        let row = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(offset)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn list_range(&self, offset: i64, limit: i64) -> Result<Vec<DictionaryEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM words ORDER BY id ASC LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn random(&self, count: i64) -> Result<Vec<DictionaryEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM words ORDER BY RANDOM() LIMIT ?");
        let rows = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(count)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Display words whose canonical key starts with `prefix` (already normalized).
    pub async fn autocomplete(&self, prefix: &str, limit: i64) -> Result<Vec<String>> {
        let words = sqlx::query_scalar::<_, String>(
            "SELECT word FROM words WHERE normalized_word LIKE ? ORDER BY id LIMIT ?",
        )
        .bind(format!("{prefix}%"))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(words)
    }

    pub async fn etymology_types(&self) -> Result<Vec<String>> {
        let types = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT etymology_type FROM words WHERE etymology_type IS NOT NULL ORDER BY etymology_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }

    /// Every canonical key, for cross-reference linking.
    pub async fn normalized_words(&self) -> Result<Vec<String>> {
        let words = sqlx::query_scalar::<_, String>("SELECT normalized_word FROM words ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(words)
    }

    pub async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM words")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Insert entries in transactions of [`BATCH_SIZE`]; entries without a word are skipped.
    ///
    /// `normalized_word` is always derived from `word`.
    pub async fn insert_batch(&self, entries: &[NewEntry]) -> Result<usize> {
        let mut inserted = 0;
        let valid: Vec<&NewEntry> = entries.iter().filter(|e| e.has_word()).collect();

        for chunk in valid.chunks(BATCH_SIZE) {
            let mut tx = self.pool.begin().await?;
            for entry in chunk {
                sqlx::query(
                    r#"
                    INSERT INTO words (
                        word, normalized_word, meaning, meaning_tr, full_entry_text,
                        full_entry_text_tr, etymology_type, variants, page, skeleton, cross_reference
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&entry.word)
                .bind(entry.normalized_word())
                .bind(&entry.meaning)
                .bind(&entry.meaning_tr)
                .bind(&entry.full_entry_text)
                .bind(&entry.full_entry_text_tr)
                .bind(&entry.etymology_type)
                .bind(entry.variants_json())
                .bind(entry.page)
                .bind(&entry.skeleton)
                .bind(&entry.cross_reference)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
            inserted += chunk.len();
            debug!(inserted, "Committed entry batch");
        }

        info!(
            inserted,
            skipped = entries.len() - inserted,
            "Inserted dictionary entries"
        );
        Ok(inserted)
    }

    /// Delete every entry and reset the id sequence.
    pub async fn clear(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM words")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'words'")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(deleted, "Cleared words table");
        Ok(deleted)
    }

    /// Recompute `normalized_word` for every entry, in batches.
    ///
    /// Idempotent: a second run reports zero changes.
    pub async fn repair_normalization(&self) -> Result<NormalizationRepair> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, word, normalized_word FROM words ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let mut changed = 0;
        for chunk in rows.chunks(BATCH_SIZE) {
            let mut tx = self.pool.begin().await?;
            for (id, word, current) in chunk {
                let normalized = normalize(word);
                if &normalized == current {
                    continue;
                }
                sqlx::query("UPDATE words SET normalized_word = ? WHERE id = ?")
                    .bind(&normalized)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                changed += 1;
            }
            tx.commit().await?;
        }

        let repair = NormalizationRepair {
            processed: rows.len(),
            changed,
        };
        info!(
            processed = repair.processed,
            changed = repair.changed,
            "Normalization repair finished"
        );
        Ok(repair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_in_memory;
    use crate::query::{compile, Scope};

    fn entry(word: &str, meaning: &str, etymology: &str) -> NewEntry {
        NewEntry {
            word: word.to_string(),
            meaning: Some(meaning.to_string()),
            meaning_tr: Some(format!("{meaning} (tr)")),
            etymology_type: Some(etymology.to_string()),
            variants: vec![format!("{word}-v")],
            page: Some(1),
            ..Default::default()
        }
    }

    async fn seeded() -> WordRepository {
        let repo = WordRepository::new(connect_in_memory().await.unwrap());
        repo.insert_batch(&[
            entry("Kan", "blood", "Basic"),
            entry("kanat", "wing", "Basic"),
            entry("ḳān", "khan", "Mongolian"),
            entry("1 ı", "plant", "Basic"),
            entry("", "skipped", "Basic"),
        ])
        .await
        .unwrap();
        repo
    }

    async fn run(repo: &WordRepository, q: &str, scope: Scope, etymology: Option<&str>) -> Vec<String> {
        let filter = SearchFilter::new(&compile(q, scope), scope, etymology);
        let (entries, total) = repo.search(&filter, 50, 0).await.unwrap();
        assert_eq!(total as usize, entries.len());
        entries.into_iter().map(|e| e.word).collect()
    }

    #[tokio::test]
    async fn insert_derives_normalized_word_and_skips_blank() {
        let repo = seeded().await;
        assert_eq!(repo.count().await.unwrap(), 4);
        let first = repo.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(first.normalized_word, "kan");
        assert_eq!(first.variants, vec!["Kan-v"]);
        let fourth = repo.get_by_offset(3).await.unwrap().unwrap();
        assert_eq!(fourth.normalized_word, "ı");
    }

    #[tokio::test]
    async fn search_modes_against_storage() {
        let repo = seeded().await;
        assert_eq!(run(&repo, "baş=kan", Scope::Word, None).await, vec!["Kan", "kanat"]);
        assert_eq!(run(&repo, "tam=ka", Scope::Word, None).await, Vec::<String>::new());
        assert_eq!(run(&repo, "tam=Kan", Scope::Word, None).await, vec!["Kan"]);
        assert_eq!(run(&repo, "son=at", Scope::Word, None).await, vec!["kanat"]);
        assert_eq!(run(&repo, "k.n", Scope::Word, None).await, vec!["Kan"]);
        assert_eq!(run(&repo, "an", Scope::Word, Some("Basic")).await, vec!["Kan", "kanat"]);
    }

    #[tokio::test]
    async fn meaning_scope_searches_both_fields() {
        let repo = seeded().await;
        assert_eq!(run(&repo, "tam=wing", Scope::Meaning, None).await, vec!["kanat"]);
        assert_eq!(run(&repo, "tam=wing (tr)", Scope::Meaning, None).await, vec!["kanat"]);
        assert_eq!(run(&repo, "BLOO", Scope::Meaning, None).await, vec!["Kan"]);
    }

    #[tokio::test]
    async fn pagination_reports_full_total() {
        let repo = seeded().await;
        let filter = SearchFilter::new(&compile("a", Scope::Word), Scope::Word, None);
        let (page, total) = repo.search(&filter, 1, 1).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page[0].word, "kanat");
    }

    #[tokio::test]
    async fn offset_beyond_table_is_none() {
        let repo = seeded().await;
        assert!(repo.get_by_offset(10).await.unwrap().is_none());
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_helpers() {
        let repo = seeded().await;
        assert_eq!(repo.autocomplete("ka", 10).await.unwrap(), vec!["Kan", "kanat"]);
        assert_eq!(repo.etymology_types().await.unwrap(), vec!["Basic", "Mongolian"]);
        assert_eq!(repo.normalized_words().await.unwrap().len(), 4);
        assert_eq!(repo.list_range(1, 2).await.unwrap().len(), 2);
        assert_eq!(repo.random(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn repair_normalization_converges() {
        let repo = seeded().await;
        sqlx::query("UPDATE words SET normalized_word = 'stale' WHERE id IN (1, 2)")
            .execute(repo.pool())
            .await
            .unwrap();

        let first = repo.repair_normalization().await.unwrap();
        assert_eq!(first, NormalizationRepair { processed: 4, changed: 2 });
        let second = repo.repair_normalization().await.unwrap();
        assert_eq!(second.changed, 0);
        assert_eq!(repo.get_by_id(2).await.unwrap().unwrap().normalized_word, "kanat");
    }

    #[tokio::test]
    async fn clear_resets_sequence() {
        let repo = seeded().await;
        assert_eq!(repo.clear().await.unwrap(), 4);
        assert_eq!(repo.count().await.unwrap(), 0);
        repo.insert_batch(&[entry("ab", "x", "Basic")]).await.unwrap();
        assert_eq!(repo.get_by_offset(0).await.unwrap().unwrap().id, 1);
    }

    #[tokio::test]
    async fn large_inserts_span_several_batches() {
        let repo = WordRepository::new(connect_in_memory().await.unwrap());
        let entries: Vec<NewEntry> = (0..(BATCH_SIZE * 2 + 7))
            .map(|i| entry(&format!("w{i}"), "m", "Basic"))
            .collect();
        assert_eq!(repo.insert_batch(&entries).await.unwrap(), BATCH_SIZE * 2 + 7);
        assert_eq!(repo.count().await.unwrap(), (BATCH_SIZE * 2 + 7) as i64);
    }
}
