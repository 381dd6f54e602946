//! Report Controller — owns the Idle → Generating → Ready ⇄ Exporting lifecycle.
//!
//! Exactly one report (and the request that produced it) is retained. The session
//! lock is only held to read or flip state, never across the network call or the
//! export work. Both run on spawned tasks, so a dropped HTTP connection cannot
//! leave the session stuck mid-transition.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::document::date;
use crate::document::save::{save_export, EXPORT_FILE_NAME};
use crate::document::{
    DocxEngine, ExportDocument, ExportError, ExportedFile, GateError, ReadinessGate,
};
use crate::generation::generator::generate_report;
use crate::llm_client::GenerationClient;
use crate::models::report::{
    FormRejection, GeneratedReport, GenerationOutcome, Identity, ReportForm, ReportRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Generating,
    Ready,
    Exporting,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("invalid submission: {0:?}")]
    Validation(FormRejection),

    #[error("another operation is in progress ({0:?})")]
    Busy(Phase),

    #[error("no report to export")]
    NothingToExport,

    #[error("document engine unavailable: {0}")]
    EngineUnavailable(GateError),

    #[error("export failed: {0}")]
    Export(ExportError),

    #[error("background task failed: {0}")]
    Task(String),
}

impl From<ExportError> for ControllerError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Gate(gate) => ControllerError::EngineUnavailable(gate),
            other => ControllerError::Export(other),
        }
    }
}

/// Read-only view of the session for the preview panel.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPreview {
    pub phase: Phase,
    pub report: Option<PreviewReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    pub report_id: uuid::Uuid,
    pub title: String,
    pub body: String,
    pub outcome: GenerationOutcome,
    pub request: ReportRequest,
    /// Exactly what an export made now would contain.
    pub document: ExportDocument,
}

#[derive(Debug)]
struct Session {
    phase: Phase,
    request: Option<ReportRequest>,
    report: Option<GeneratedReport>,
}

pub struct ReportController {
    session: Mutex<Session>,
    llm: Arc<dyn GenerationClient>,
    engine: Arc<ReadinessGate<DocxEngine>>,
    identity: Identity,
    export_dir: Option<PathBuf>,
    today: fn() -> String,
}

impl ReportController {
    pub fn new(
        llm: Arc<dyn GenerationClient>,
        engine: Arc<ReadinessGate<DocxEngine>>,
        identity: Identity,
        export_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            session: Mutex::new(Session {
                phase: Phase::Idle,
                request: None,
                report: None,
            }),
            llm,
            engine,
            identity,
            export_dir,
            today: date::today,
        }
    }

    /// Replaces the date source used for headers.
    pub fn with_date_source(mut self, today: fn() -> String) -> Self {
        self.today = today;
        self
    }

    pub fn engine(&self) -> &ReadinessGate<DocxEngine> {
        &self.engine
    }

    pub async fn phase(&self) -> Phase {
        self.session.lock().await.phase
    }

    /// Validates the form and, if valid, runs one generation cycle.
    ///
    /// Invalid input leaves the session untouched. A failed generation call still
    /// ends in `Ready` with the fallback body.
    pub async fn submit(
        self: &Arc<Self>,
        form: ReportForm,
    ) -> Result<GeneratedReport, ControllerError> {
        let request = ReportRequest::from_form(form).map_err(|rejection| {
            info!("Rejected report submission: {rejection:?}");
            ControllerError::Validation(rejection)
        })?;

        {
            let mut session = self.session.lock().await;
            if matches!(session.phase, Phase::Generating | Phase::Exporting) {
                return Err(ControllerError::Busy(session.phase));
            }
            session.phase = Phase::Generating;
            session.report = None;
            session.request = Some(request.clone());
        }

        let this = Arc::clone(self);
        let task = tokio::spawn(async move {
            let report = generate_report(this.llm.as_ref(), &request).await;
            if report.is_fallback() {
                warn!("Report {} uses the fallback body", report.report_id);
            }
            let mut session = this.session.lock().await;
            session.report = Some(report.clone());
            session.phase = Phase::Ready;
            report
        });

        match task.await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.reset_phase(Phase::Idle).await;
                Err(ControllerError::Task(e.to_string()))
            }
        }
    }

    /// Renders the retained report. The session returns to `Ready` whatever happens.
    pub async fn export(self: &Arc<Self>) -> Result<ExportedFile, ControllerError> {
        let report = {
            let mut session = self.session.lock().await;
            if session.phase == Phase::Exporting {
                return Err(ControllerError::Busy(Phase::Exporting));
            }
            let report = session
                .report
                .clone()
                .ok_or(ControllerError::NothingToExport)?;
            session.phase = Phase::Exporting;
            report
        };

        let this = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = this.render_export(&report).await;
            this.session.lock().await.phase = Phase::Ready;
            result
        });

        match task.await {
            Ok(result) => result.map_err(ControllerError::from),
            Err(e) => {
                self.reset_phase(Phase::Ready).await;
                Err(ControllerError::Task(e.to_string()))
            }
        }
    }

    pub async fn preview(&self) -> ReportPreview {
        let session = self.session.lock().await;
        let report = match (&session.report, &session.request) {
            (Some(report), Some(request)) => Some(PreviewReport {
                report_id: report.report_id,
                title: report.title.clone(),
                body: report.body.clone(),
                outcome: report.outcome.clone(),
                request: request.clone(),
                document: ExportDocument::layout(report, &self.identity, &(self.today)()),
            }),
            _ => None,
        };
        ReportPreview {
            phase: session.phase,
            report,
        }
    }

    async fn render_export(&self, report: &GeneratedReport) -> Result<ExportedFile, ExportError> {
        let engine = self.engine.await_ready().await?;
        let document = ExportDocument::layout(report, &self.identity, &(self.today)());

        let bytes = tokio::task::spawn_blocking(move || engine.render(&document))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))??;

        if let Some(dir) = self.export_dir.clone() {
            let saved = tokio::task::spawn_blocking({
                let bytes = bytes.clone();
                move || save_export(&dir, &bytes)
            })
            .await
            .map_err(|e| ExportError::Task(e.to_string()))??;
            info!("Saved export to {}", saved.display());
        }

        info!(
            "Exported report {} ({} bytes)",
            report.report_id,
            bytes.len()
        );
        Ok(ExportedFile {
            file_name: EXPORT_FILE_NAME,
            bytes,
        })
    }

    async fn reset_phase(&self, phase: Phase) {
        warn!("Background task aborted; resetting session to {phase:?}");
        self.session.lock().await.phase = phase;
    }
}
