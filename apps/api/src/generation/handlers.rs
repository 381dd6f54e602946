//! Axum route handlers for the Reports API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::controller::{Phase, ReportPreview};
use crate::errors::AppError;
use crate::models::report::{GeneratedReport, ReportForm};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub phase: Phase,
    pub report: GeneratedReport,
}

/// POST /api/v1/reports
///
/// Validates the form and generates a report. A failed generation call still
/// returns 200 with the fallback body; `report.outcome` tells the two apart.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(form): Json<ReportForm>,
) -> Result<Json<GenerateResponse>, AppError> {
    let report = state.reports.submit(form).await?;
    Ok(Json(GenerateResponse {
        phase: state.reports.phase().await,
        report,
    }))
}

/// GET /api/v1/reports/current
pub async fn handle_preview(State(state): State<AppState>) -> Json<ReportPreview> {
    Json(state.reports.preview().await)
}

/// POST /api/v1/reports/current/export
///
/// Responds with the `.docx` as an attachment.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let file = state.reports.export().await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes::Bytes::from(file.bytes),
    )
        .into_response())
}
