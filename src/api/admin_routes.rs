//! Administrative bulk operations. Mounted behind [`super::auth::require_admin`].

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::{ApiJson, AppError, AppState};
use crate::error::DictionaryError;
use crate::models::NewEntry;

/// Insert a JSON array of entries. `normalized_word` is always recomputed.
pub async fn seed(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, AppError> {
    let Value::Array(items) = body else {
        return Err(DictionaryError::validation("Array expected").into());
    };

    let entries = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<NewEntry>(item).map_err(|e| {
                DictionaryError::validation(format!("Invalid entry at index {index}: {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let inserted = state.words.insert_batch(&entries).await?;
    info!(received = entries.len(), inserted, "Seed request processed");

    Ok(Json(json!({
        "success": true,
        "count": inserted,
        "skipped": entries.len() - inserted,
    })))
}

pub async fn clear(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let deleted = state.words.clear().await?;
    Ok(Json(json!({
        "success": true,
        "message": "Table cleared",
        "deleted": deleted,
    })))
}

pub async fn fix_normalization(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let repair = state.words.repair_normalization().await?;
    Ok(Json(json!({
        "success": true,
        "processed": repair.processed,
        "changed": repair.changed,
    })))
}
