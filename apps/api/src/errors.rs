use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::controller::ControllerError;
use crate::models::report::VALIDATION_MESSAGE;

pub const BUSY_MESSAGE: &str = "يرجى الانتظار حتى تكتمل العملية الجارية.";
pub const NOTHING_TO_EXPORT_MESSAGE: &str = "لا يوجد تقرير لتصديره. يرجى إنشاء تقرير أولاً.";
pub const ENGINE_UNAVAILABLE_MESSAGE: &str =
    "عذرًا، فشل تحميل مكتبة تصدير المستندات. يرجى التحقق من اتصالك بالإنترنت والمحاولة مرة أخرى.";
pub const EXPORT_FAILED_MESSAGE: &str =
    "عذرًا، حدث خطأ أثناء تهيئة مُصدِّر المستندات. لا يمكن إنشاء الملف.";
pub const INTERNAL_MESSAGE: &str = "عذرًا، حدث خطأ غير متوقع. يرجى المحاولة مرة أخرى.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Messages are user-facing and localized; technical detail is only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Document engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ControllerError> for AppError {
    fn from(e: ControllerError) -> Self {
        match e {
            ControllerError::Validation(_) => AppError::Validation(VALIDATION_MESSAGE.to_string()),
            ControllerError::Busy(_) => AppError::Conflict(BUSY_MESSAGE.to_string()),
            ControllerError::NothingToExport => {
                AppError::NotFound(NOTHING_TO_EXPORT_MESSAGE.to_string())
            }
            ControllerError::EngineUnavailable(gate) => AppError::EngineUnavailable(gate.to_string()),
            ControllerError::Export(export) => AppError::Export(export.to_string()),
            ControllerError::Task(detail) => AppError::Internal(anyhow::anyhow!(detail)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::EngineUnavailable(detail) => {
                tracing::error!("Document engine unavailable: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ENGINE_UNAVAILABLE",
                    ENGINE_UNAVAILABLE_MESSAGE.to_string(),
                )
            }
            AppError::Export(detail) => {
                tracing::error!("Export error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    EXPORT_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Phase;
    use crate::document::{ExportError, GateError};
    use crate::models::report::FormRejection;
    use std::time::Duration;

    fn status_of(e: ControllerError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn test_controller_errors_map_to_statuses() {
        assert_eq!(
            status_of(ControllerError::Validation(FormRejection::NoKeyPoints)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ControllerError::Busy(Phase::Generating)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ControllerError::NothingToExport),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ControllerError::EngineUnavailable(GateError::Timeout(
                Duration::from_secs(10)
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ControllerError::Export(ExportError::Render("zip".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_uses_localized_message() {
        let e = AppError::from(ControllerError::Validation(FormRejection::MissingModuleTitle));
        assert!(matches!(e, AppError::Validation(ref m) if m == VALIDATION_MESSAGE));
    }
}
