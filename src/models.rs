//! Dictionary entry and report models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DictionaryError;
use crate::normalize::normalize;

/// A dictionary entry as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: i64,
    pub word: String,
    pub normalized_word: String,
    pub meaning: Option<String>,
    pub meaning_tr: Option<String>,
    pub full_entry_text: Option<String>,
    pub full_entry_text_tr: Option<String>,
    pub etymology_type: Option<String>,
    pub variants: Vec<String>,
    pub page: Option<i64>,
    pub skeleton: Option<String>,
    pub cross_reference: Option<String>,
}

/// An entry ready for insertion (bulk import and seed).
///
/// A `normalized_word` present in the source JSON is ignored; the key is
/// always recomputed from `word`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewEntry {
    #[serde(default, deserialize_with = "deserialize_word")]
    pub word: String,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub meaning_tr: Option<String>,
    #[serde(default)]
    pub full_entry_text: Option<String>,
    #[serde(default)]
    pub full_entry_text_tr: Option<String>,
    #[serde(default)]
    pub etymology_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_variants")]
    pub variants: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub page: Option<i64>,
    #[serde(default)]
    pub skeleton: Option<String>,
    #[serde(default)]
    pub cross_reference: Option<String>,
}

impl NewEntry {
    pub fn normalized_word(&self) -> String {
        normalize(&self.word)
    }

    /// Entries without a headword are skipped on import.
    pub fn has_word(&self) -> bool {
        !self.word.trim().is_empty()
    }

    /// Variants as stored in the `variants` TEXT column.
    pub fn variants_json(&self) -> String {
        serde_json::to_string(&self.variants).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Why a user flagged an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportReason {
    MeaningError,
    Typo,
    Other,
}

impl ReportReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MeaningError => "meaning-error",
            Self::Typo => "typo",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportReason {
    type Err = DictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meaning-error" => Ok(Self::MeaningError),
            "typo" => Ok(Self::Typo),
            "other" => Ok(Self::Other),
            other => Err(DictionaryError::validation(format!(
                "Unknown report reason '{other}', expected meaning-error, typo or other"
            ))),
        }
    }
}

/// A stored user report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub id: i64,
    pub word: String,
    pub page: Option<i64>,
    pub reason: String,
    pub description: String,
    pub timestamp: String,
}

/// A validated report ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub word: String,
    pub page: Option<i64>,
    pub reason: ReportReason,
    pub description: String,
    pub timestamp: String,
}

/// Decode the stored `variants` column.
///
/// `[...]` text is parsed as a JSON list; anything else is comma-split. A
/// failed JSON parse yields an empty list rather than an error.
pub fn parse_variants(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    if raw.starts_with('[') && raw.ends_with(']') {
        return match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
            Ok(values) => variants_from_values(values),
            Err(_) => Vec::new(),
        };
    }

    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn variants_from_values(values: Vec<serde_json::Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect()
}

/// Accept variants as a JSON list or as a comma-separated / JSON-encoded string.
fn deserialize_variants<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => parse_variants(Some(&s)),
        serde_json::Value::Array(values) => variants_from_values(values),
        _ => Vec::new(),
    })
}

/// A `null` headword reads as empty, so the entry is skipped rather than rejected.
fn deserialize_word<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a page as a number, a numeric string, or empty/null.
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_from_json_list() {
        assert_eq!(parse_variants(Some(r#"["ab", "aba"]"#)), vec!["ab", "aba"]);
    }

    #[test]
    fn variants_from_comma_list() {
        assert_eq!(parse_variants(Some("ab, aba ,,")), vec!["ab", "aba"]);
    }

    #[test]
    fn malformed_json_variants_fall_back_to_empty() {
        assert!(parse_variants(Some("[not json]")).is_empty());
        assert_eq!(parse_variants(Some("[ab, aba")), vec!["[ab", "aba"]);
    }

    #[test]
    fn missing_variants_are_empty() {
        assert!(parse_variants(None).is_empty());
        assert!(parse_variants(Some("  ")).is_empty());
        assert!(parse_variants(Some("[]")).is_empty());
    }

    #[test]
    fn new_entry_accepts_loose_source_json() {
        let entry: NewEntry = serde_json::from_str(
            r#"{"word": "Ā:ġ", "normalized_word": "ignored", "page": "12",
                "variants": ["a", "b"], "etymology_type": "Basic"}"#,
        )
        .unwrap();
        assert_eq!(entry.page, Some(12));
        assert_eq!(entry.variants, vec!["a", "b"]);
        assert_eq!(entry.normalized_word(), "aġ");
        assert_eq!(entry.variants_json(), r#"["a","b"]"#);
    }

    #[test]
    fn new_entry_variants_from_string_and_empty_page() {
        let entry: NewEntry =
            serde_json::from_str(r#"{"word": "ab", "variants": "x, y", "page": ""}"#).unwrap();
        assert_eq!(entry.variants, vec!["x", "y"]);
        assert_eq!(entry.page, None);
    }

    #[test]
    fn null_word_reads_as_missing_headword() {
        let entry: NewEntry =
            serde_json::from_str(r#"{"word": null, "meaning": "orphan"}"#).unwrap();
        assert_eq!(entry.word, "");
        assert!(!entry.has_word());
    }

    #[test]
    fn report_reason_round_trips_kebab_case() {
        assert_eq!("meaning-error".parse::<ReportReason>().ok(), Some(ReportReason::MeaningError));
        assert_eq!(ReportReason::Typo.to_string(), "typo");
        assert!("spam".parse::<ReportReason>().is_err());
    }
}
