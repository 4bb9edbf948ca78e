//! Single-entry lookup, sequential browsing and rendered entry text.

use std::collections::HashSet;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::search_routes::non_negative_offset;
use super::{ApiPath, ApiQuery, AppError, AppState};
use crate::error::DictionaryError;
use crate::models::DictionaryEntry;
use crate::rich_text::{render, to_html, Inline};

pub async fn get_word(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DictionaryEntry>, AppError> {
    let entry = state
        .words
        .get_by_id(id)
        .await?
        .ok_or_else(|| DictionaryError::not_found("Word not found"))?;
    Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct OffsetParams {
    pub offset: Option<i64>,
}

pub async fn by_offset(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<OffsetParams>,
) -> Result<Json<DictionaryEntry>, AppError> {
    let offset = non_negative_offset(params.offset)?;
    let entry = state
        .words
        .get_by_offset(offset)
        .await?
        .ok_or_else(|| DictionaryError::not_found("No more words"))?;
    Ok(Json(entry))
}

/// Every canonical key, for client-side cross-reference linking.
pub async fn list_words(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.words.normalized_words().await?))
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn range(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RangeParams>,
) -> Result<Json<Vec<DictionaryEntry>>, AppError> {
    let offset = non_negative_offset(params.offset)?;
    let limit = state.limits.resolve(params.limit);
    Ok(Json(state.words.list_range(offset, limit).await?))
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

#[derive(Debug, Deserialize)]
pub struct RenderParams {
    #[serde(default)]
    pub lang: Language,
}

#[derive(Debug, Serialize)]
pub struct RenderedEntry {
    pub id: i64,
    pub word: String,
    pub nodes: Vec<Inline>,
    pub html: String,
}

/// The entry's full text with bold headwords linked to their entries.
///
/// `lang=tr` uses the Turkish text, falling back to the English one.
pub async fn rendered(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<RenderParams>,
) -> Result<Json<RenderedEntry>, AppError> {
    let entry = state
        .words
        .get_by_id(id)
        .await?
        .ok_or_else(|| DictionaryError::not_found("Word not found"))?;

    let text = entry_text(&entry, params.lang);
    let known: HashSet<String> = state.words.normalized_words().await?.into_iter().collect();
    let nodes = render(text, &known);
    let html = to_html(&nodes);

    Ok(Json(RenderedEntry {
        id: entry.id,
        word: entry.word,
        nodes,
        html,
    }))
}

fn entry_text(entry: &DictionaryEntry, lang: Language) -> &str {
    let english = entry.full_entry_text.as_deref().unwrap_or_default();
    match lang {
        Language::En => english,
        Language::Tr => entry
            .full_entry_text_tr
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(english),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(en: Option<&str>, tr: Option<&str>) -> DictionaryEntry {
        DictionaryEntry {
            id: 1,
            word: "ab".into(),
            normalized_word: "ab".into(),
            meaning: None,
            meaning_tr: None,
            full_entry_text: en.map(Into::into),
            full_entry_text_tr: tr.map(Into::into),
            etymology_type: None,
            variants: Vec::new(),
            page: None,
            skeleton: None,
            cross_reference: None,
        }
    }

    #[test]
    fn turkish_text_falls_back_to_english() {
        let both = entry(Some("hunt"), Some("av"));
        assert_eq!(entry_text(&both, Language::Tr), "av");
        assert_eq!(entry_text(&both, Language::En), "hunt");

        let english_only = entry(Some("hunt"), Some("  "));
        assert_eq!(entry_text(&english_only, Language::Tr), "hunt");
        assert_eq!(entry_text(&entry(None, None), Language::Tr), "");
    }
}
