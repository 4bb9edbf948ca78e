//! User error reports.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ApiJson, AppError, AppState};
use crate::error::DictionaryError;
use crate::models::{deserialize_page, NewReport, Report, ReportReason};

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub word: Option<String>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub page: Option<i64>,
    pub reason: Option<String>,
    pub description: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportAck {
    pub success: bool,
    pub message: String,
    pub id: i64,
}

impl CreateReportRequest {
    fn validate(self) -> Result<NewReport, DictionaryError> {
        let (Some(word), Some(reason)) = (
            self.word.filter(|w| !w.trim().is_empty()),
            self.reason.filter(|r| !r.trim().is_empty()),
        ) else {
            return Err(DictionaryError::validation("Word and reason are required"));
        };

        Ok(NewReport {
            word,
            page: self.page,
            reason: reason.trim().parse::<ReportReason>()?,
            description: self.description.unwrap_or_default(),
            timestamp: self
                .timestamp
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        })
    }
}

pub async fn create_report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateReportRequest>,
) -> Result<Json<ReportAck>, AppError> {
    let report = request.validate()?;
    let id = state.reports.create(&report).await?;
    Ok(Json(ReportAck {
        success: true,
        message: "Report saved".to_string(),
        id,
    }))
}

/// All reports, newest first. Admin only.
pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>, AppError> {
    Ok(Json(state.reports.list().await?))
}
