//! Save-to-disk primitive for exported reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Every export is offered under this name.
pub const EXPORT_FILE_NAME: &str = "report.docx";

/// Writes `bytes` to `dir/report.docx`, replacing any earlier export.
///
/// The bytes go to a temp file in the same directory first and are renamed into
/// place, so a failed write never leaves a truncated report behind.
pub fn save_export(dir: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(EXPORT_FILE_NAME);

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    Ok(target)
}
