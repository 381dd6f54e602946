use std::sync::Arc;

use crate::controller::ReportController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single report session: retained request, report, and phase.
    pub reports: Arc<ReportController>,
}
