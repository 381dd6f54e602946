//! Export layout — the fixed page structure of a report document.
//!
//! Pure data: no docx types here, so the structure can be checked without
//! serializing anything. `DocxEngine` turns it into bytes.

use serde::Serialize;

use crate::models::report::{GeneratedReport, Identity};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderRow {
    /// `الاسم الكامل: {full_name}`, right-aligned.
    pub right_cell: String,
    /// `{location} في {date}`, left-aligned.
    pub left_cell: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub header: HeaderRow,
    /// `رقم التأجير: {rental_number}`
    pub rental_line: String,
    pub title: String,
    /// One entry per body line. Empty strings are kept as empty paragraphs.
    pub paragraphs: Vec<String>,
}

impl ExportDocument {
    pub fn layout(report: &GeneratedReport, identity: &Identity, date: &str) -> Self {
        Self {
            header: HeaderRow {
                right_cell: format!("الاسم الكامل: {}", identity.full_name),
                left_cell: format!("{} في {}", identity.location, date),
            },
            rental_line: format!("رقم التأجير: {}", identity.rental_number),
            title: report.title.clone(),
            paragraphs: split_paragraphs(&report.body),
        }
    }
}

/// Splits on `\n` without collapsing blank lines. A trailing `\r` is dropped.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
