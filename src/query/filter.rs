//! Parameterized WHERE-clause construction for search.

use super::{CompiledQuery, OperatorMode, Scope};

/// Columns selected for a full dictionary entry, in `EntryRow` order.
pub const ENTRY_COLUMNS: &str = "id, word, normalized_word, meaning, meaning_tr, \
     full_entry_text, full_entry_text_tr, etymology_type, variants, page, skeleton, \
     cross_reference";

/// Etymology filter value meaning "no filter".
const ALL_ETYMOLOGIES: &str = "all";

/// WHERE clause plus its bind values, shared by the COUNT and SELECT queries.
///
/// The clause text only ever contains fixed fragments and `?` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    clause: String,
    params: Vec<String>,
}

impl SearchFilter {
    pub fn new(compiled: &CompiledQuery, scope: Scope, etymology: Option<&str>) -> Self {
        let exact = compiled.mode == OperatorMode::Exact;

        let (mut clause, mut params) = match scope {
            Scope::Meaning => {
                let clause = if exact {
                    "(meaning = ? OR meaning_tr = ?)"
                } else {
                    "(meaning LIKE ? OR meaning_tr LIKE ?)"
                };
                (
                    clause.to_string(),
                    vec![compiled.pattern.clone(), compiled.pattern.clone()],
                )
            }
            Scope::Word => {
                let clause = if exact {
                    "normalized_word = ?"
                } else {
                    "normalized_word LIKE ?"
                };
                (clause.to_string(), vec![compiled.pattern.clone()])
            }
        };

        if let Some(etymology) = etymology.filter(|e| !e.is_empty() && *e != ALL_ETYMOLOGIES) {
            clause.push_str(" AND etymology_type = ?");
            params.push(etymology.to_string());
        }

        Self { clause, params }
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Bind values in placeholder order (excluding LIMIT/OFFSET).
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM words WHERE {}", self.clause)
    }

    /// SELECT with two trailing placeholders for LIMIT and OFFSET.
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT {ENTRY_COLUMNS} FROM words WHERE {} ORDER BY id LIMIT ? OFFSET ?",
            self.clause
        )
    }
}
