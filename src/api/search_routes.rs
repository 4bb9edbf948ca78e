//! Search and dictionary-wide read endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{ApiQuery, AppError, AppState};
use crate::error::DictionaryError;
use crate::models::DictionaryEntry;
use crate::normalize::normalize;
use crate::query::{compile, OperatorMode, Scope, SearchFilter};

const AUTOCOMPLETE_MIN_CHARS: usize = 2;
const AUTOCOMPLETE_LIMIT: i64 = 10;
const RANDOM_MAX_COUNT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub scope: Option<String>,
    pub etymology: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub normalized: String,
    pub mode: OperatorMode,
    pub results: Vec<DictionaryEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| DictionaryError::validation("Query parameter 'q' is required"))?;
    let scope = match params.scope.as_deref() {
        None | Some("") => Scope::default(),
        Some(raw) => raw.parse()?,
    };
    let limit = state.limits.resolve(params.limit);
    let offset = non_negative_offset(params.offset)?;

    let compiled = compile(&query, scope);
    if compiled.is_empty() {
        info!(query = %query, "Query has no searchable content");
        return Ok(Json(SearchResponse {
            query,
            normalized: compiled.pattern,
            mode: compiled.mode,
            results: Vec::new(),
            total: 0,
            limit,
            offset,
        }));
    }

    let filter = SearchFilter::new(&compiled, scope, params.etymology.as_deref());
    let (results, total) = state.words.search(&filter, limit, offset).await?;
    info!(
        query = %query,
        mode = %compiled.mode,
        total,
        "Search"
    );

    Ok(Json(SearchResponse {
        query,
        normalized: compiled.pattern,
        mode: compiled.mode,
        results,
        total,
        limit,
        offset,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    pub q: Option<String>,
}

pub async fn autocomplete(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AutocompleteParams>,
) -> Result<Json<Vec<String>>, AppError> {
    let Some(q) = params
        .q
        .filter(|q| q.chars().count() >= AUTOCOMPLETE_MIN_CHARS)
    else {
        return Ok(Json(Vec::new()));
    };

    let prefix = normalize(&q);
    if prefix.is_empty() {
        return Ok(Json(Vec::new()));
    }
    // Plain prefix match; wildcards are not autocomplete syntax.
    let prefix: String = prefix.chars().filter(|c| !matches!(c, '%' | '_')).collect();
    Ok(Json(state.words.autocomplete(&prefix, AUTOCOMPLETE_LIMIT).await?))
}

pub async fn etymologies(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.words.etymology_types().await?))
}

#[derive(Debug, Deserialize)]
pub struct RandomParams {
    pub count: Option<i64>,
}

/// One random entry, or a list of them when `count > 1`.
pub async fn random(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RandomParams>,
) -> Result<Json<Value>, AppError> {
    let count = params.count.unwrap_or(1).clamp(1, RANDOM_MAX_COUNT);
    let mut entries = state.words.random(count).await?;

    if count > 1 {
        return Ok(Json(serde_json::to_value(entries)?));
    }
    let entry = entries
        .pop()
        .ok_or_else(|| DictionaryError::not_found("Dictionary is empty"))?;
    Ok(Json(serde_json::to_value(entry)?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let total = state.words.count().await?;
    Ok(Json(json!({ "total": total })))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let word_count = state.words.count().await?;
    Ok(Json(json!({
        "status": "ok",
        "word_count": word_count,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

pub(crate) fn non_negative_offset(offset: Option<i64>) -> Result<i64, DictionaryError> {
    match offset.unwrap_or(0) {
        o if o < 0 => Err(DictionaryError::validation(
            "Query parameter 'offset' must not be negative",
        )),
        o => Ok(o),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_default_to_zero_and_reject_negatives() {
        assert_eq!(non_negative_offset(None).unwrap(), 0);
        assert_eq!(non_negative_offset(Some(40)).unwrap(), 40);
        assert!(matches!(
            non_negative_offset(Some(-1)),
            Err(DictionaryError::Validation(_))
        ));
    }
}
