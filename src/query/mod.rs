//! Search query compiler.
//!
//! Translates the user-facing search mini-language into a LIKE/equality
//! pattern plus parameterized WHERE-clause fragments:
//!
//! | Query       | Mode         | Pattern (word scope)   |
//! |-------------|--------------|------------------------|
//! | `baş=kan`   | `startsWith` | `kan%`                 |
//! | `son=kan`   | `endsWith`   | `%kan`                 |
//! | `tam=Kan`   | `exact`      | `kan`                  |
//! | `k.n`, `k&` | `pattern`    | `k_n`, `k%`            |
//! | `kan`       | `contains`   | `%kan%`                |
//!
//! User text only ever reaches the database as a bound parameter; the SQL
//! text is assembled from the fixed fragments in [`filter`].

mod filter;

pub use filter::{SearchFilter, ENTRY_COLUMNS};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DictionaryError;
use crate::normalize::normalize;

/// SQL single-character wildcard; the user types `.`.
pub const SINGLE_WILDCARD: char = '_';
/// SQL multi-character wildcard; the user types `&` or `%`.
pub const MULTI_WILDCARD: char = '%';

const STARTS_WITH_PREFIX: &str = "baş=";
const ENDS_WITH_PREFIX: &str = "son=";
const EXACT_PREFIX: &str = "tam=";

/// Which field a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Canonical key (`normalized_word`); operands are normalized.
    #[default]
    Word,
    /// Free-text meanings (`meaning`, `meaning_tr`); operands are not normalized.
    Meaning,
}

impl FromStr for Scope {
    type Err = DictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Self::Word),
            "meaning" => Ok(Self::Meaning),
            other => Err(DictionaryError::validation(format!(
                "Unknown search scope '{other}', expected 'word' or 'meaning'"
            ))),
        }
    }
}

/// Matching strategy a query compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperatorMode {
    StartsWith,
    EndsWith,
    Exact,
    Pattern,
    Contains,
}

impl OperatorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Exact => "exact",
            Self::Pattern => "pattern",
            Self::Contains => "contains",
        }
    }
}

impl fmt::Display for OperatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`compile`]: the pattern to bind and how to match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    pub pattern: String,
    pub mode: OperatorMode,
}

impl CompiledQuery {
    /// True when an operator or plain query had no literal content left
    /// (`tam=`, `baş=`, `123`).
    ///
    /// Callers treat this as "no query" and return no results. A `pattern`
    /// query always carries a user-typed marker and is never empty, so `&`
    /// alone matches every entry.
    pub fn is_empty(&self) -> bool {
        let operand = match self.mode {
            OperatorMode::Pattern => return false,
            OperatorMode::Exact => self.pattern.as_str(),
            OperatorMode::StartsWith => self
                .pattern
                .strip_suffix(MULTI_WILDCARD)
                .unwrap_or(&self.pattern),
            OperatorMode::EndsWith => self
                .pattern
                .strip_prefix(MULTI_WILDCARD)
                .unwrap_or(&self.pattern),
            OperatorMode::Contains => self
                .pattern
                .strip_prefix(MULTI_WILDCARD)
                .and_then(|p| p.strip_suffix(MULTI_WILDCARD))
                .unwrap_or(&self.pattern),
        };
        operand.is_empty()
    }
}

/// Compile a raw user query for the given scope.
pub fn compile(raw: &str, scope: Scope) -> CompiledQuery {
    let query = raw.trim();

    if let Some(term) = query.strip_prefix(STARTS_WITH_PREFIX) {
        return CompiledQuery {
            pattern: format!("{}{MULTI_WILDCARD}", operand(term, scope)),
            mode: OperatorMode::StartsWith,
        };
    }
    if let Some(term) = query.strip_prefix(ENDS_WITH_PREFIX) {
        return CompiledQuery {
            pattern: format!("{MULTI_WILDCARD}{}", operand(term, scope)),
            mode: OperatorMode::EndsWith,
        };
    }
    if let Some(term) = query.strip_prefix(EXACT_PREFIX) {
        return CompiledQuery {
            pattern: operand(term, scope),
            mode: OperatorMode::Exact,
        };
    }

    let pattern = compile_wildcards(query, scope);
    if pattern.contains([SINGLE_WILDCARD, MULTI_WILDCARD]) {
        CompiledQuery {
            pattern,
            mode: OperatorMode::Pattern,
        }
    } else {
        CompiledQuery {
            pattern: format!("{MULTI_WILDCARD}{pattern}{MULTI_WILDCARD}"),
            mode: OperatorMode::Contains,
        }
    }
}

/// Operand of an explicit prefix operator.
fn operand(term: &str, scope: Scope) -> String {
    match scope {
        Scope::Word => normalize(term),
        Scope::Meaning => term.trim().to_string(),
    }
}

/// Translate user wildcards, then normalize literal segments only.
///
/// Translation happens first because normalization strips `.`.
fn compile_wildcards(query: &str, scope: Scope) -> String {
    let translated: String = query
        .chars()
        .map(|c| match c {
            '.' => SINGLE_WILDCARD,
            '&' => MULTI_WILDCARD,
            other => other,
        })
        .collect();

    split_segments(&translated)
        .into_iter()
        .map(|segment| match segment {
            Segment::Wildcard(marker) => marker.to_string(),
            Segment::Literal(text) => match scope {
                Scope::Word => normalize(text),
                Scope::Meaning => text.to_lowercase(),
            },
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Wildcard(char),
}

fn split_segments(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (idx, c) in input.char_indices() {
        if c == SINGLE_WILDCARD || c == MULTI_WILDCARD {
            if start < idx {
                segments.push(Segment::Literal(&input[start..idx]));
            }
            segments.push(Segment::Wildcard(c));
            start = idx + c.len_utf8();
        }
    }
    if start < input.len() {
        segments.push(Segment::Literal(&input[start..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_operator() {
        let q = compile("baş=kan", Scope::Word);
        assert_eq!(q.mode, OperatorMode::StartsWith);
        assert_eq!(q.pattern, "kan%");
    }

    #[test]
    fn ends_with_operator_normalizes_operand() {
        let q = compile("son=Ḏā:", Scope::Word);
        assert_eq!(q.mode, OperatorMode::EndsWith);
        assert_eq!(q.pattern, "%da");
    }

    #[test]
    fn exact_operator() {
        let q = compile("tam=Kan", Scope::Word);
        assert_eq!(q.mode, OperatorMode::Exact);
        assert_eq!(q.pattern, normalize("Kan"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_before_prefix_detection() {
        let q = compile("  tam=ab  ", Scope::Word);
        assert_eq!(q.mode, OperatorMode::Exact);
        assert_eq!(q.pattern, "ab");
    }

    #[test]
    fn dot_becomes_single_char_wildcard() {
        let q = compile("k.n", Scope::Word);
        assert_eq!(q.mode, OperatorMode::Pattern);
        assert_eq!(q.pattern, "k_n");
    }

    #[test]
    fn ampersand_and_percent_become_multi_char_wildcard() {
        assert_eq!(compile("ka&", Scope::Word).pattern, "ka%");
        assert_eq!(compile("%an", Scope::Word).pattern, "%an");
        assert_eq!(compile("%an", Scope::Word).mode, OperatorMode::Pattern);
    }

    #[test]
    fn pattern_mode_adds_no_implicit_anchors() {
        let q = compile("a.a", Scope::Word);
        assert_eq!(q.pattern, "a_a");
        assert!(!q.pattern.starts_with('%'));
        assert!(!q.pattern.ends_with('%'));
    }

    #[test]
    fn literal_segments_are_normalized_around_wildcards() {
        let q = compile("Ā:.Ñ&", Scope::Word);
        assert_eq!(q.mode, OperatorMode::Pattern);
        assert_eq!(q.pattern, "a_n%");
    }

    #[test]
    fn plain_query_is_contains() {
        let q = compile("kan", Scope::Word);
        assert_eq!(q.mode, OperatorMode::Contains);
        assert_eq!(q.pattern, format!("%{}%", normalize("kan")));
    }

    #[test]
    fn contains_normalizes_operand() {
        assert_eq!(compile("KIZ", Scope::Word).pattern, "%kız%");
    }

    #[test]
    fn meaning_scope_prefix_operand_is_verbatim() {
        let q = compile("baş=Black-ish:", Scope::Meaning);
        assert_eq!(q.pattern, "Black-ish:%");
        let q = compile("tam=to go", Scope::Meaning);
        assert_eq!(q.pattern, "to go");
    }

    #[test]
    fn meaning_scope_wildcard_path_only_lowercases() {
        let q = compile("Black ā", Scope::Meaning);
        assert_eq!(q.mode, OperatorMode::Contains);
        assert_eq!(q.pattern, "%black ā%");

        let q = compile("to g.", Scope::Meaning);
        assert_eq!(q.mode, OperatorMode::Pattern);
        assert_eq!(q.pattern, "to g_");
    }

    #[test]
    fn empty_operands_are_flagged() {
        assert!(compile("tam=", Scope::Word).is_empty());
        assert!(compile("baş=", Scope::Word).is_empty());
        assert!(compile("123", Scope::Word).is_empty());
        assert!(compile("son=", Scope::Meaning).is_empty());
        assert!(!compile(".", Scope::Word).is_empty());
        assert!(!compile("kan", Scope::Word).is_empty());
    }

    #[test]
    fn bare_wildcards_are_patterns_not_empty_queries() {
        let all = compile("&", Scope::Word);
        assert_eq!(all.mode, OperatorMode::Pattern);
        assert_eq!(all.pattern, "%");
        assert!(!all.is_empty());
        assert!(!compile("%%", Scope::Word).is_empty());
    }

    #[test]
    fn segments_split_on_markers() {
        assert_eq!(
            split_segments("a_bç%"),
            vec![
                Segment::Literal("a"),
                Segment::Wildcard('_'),
                Segment::Literal("bç"),
                Segment::Wildcard('%'),
            ]
        );
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn scope_parses_from_query_string_values() {
        assert_eq!("word".parse::<Scope>().ok(), Some(Scope::Word));
        assert_eq!("meaning".parse::<Scope>().ok(), Some(Scope::Meaning));
        assert!("both".parse::<Scope>().is_err());
    }

    #[test]
    fn mode_serializes_camel_case() {
        let json = serde_json::to_string(&OperatorMode::StartsWith).unwrap();
        assert_eq!(json, "\"startsWith\"");
    }
}
