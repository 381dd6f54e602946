// Document export: readiness gate, layout model, docx rendering, disk save.
// Rendering is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod date;
pub mod docx;
pub mod gate;
pub mod layout;
pub mod save;

use thiserror::Error;

pub use docx::{DocumentStyle, DocxEngine};
pub use gate::{GateError, ReadinessGate};
pub use layout::ExportDocument;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("document render failed: {0}")]
    Render(String),

    #[error("saving export failed: {0}")]
    Save(#[from] std::io::Error),

    #[error("export task failed: {0}")]
    Task(String),
}

/// A finished export, ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}
