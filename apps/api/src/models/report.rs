//! Report data model — form input, validated request, generated report, identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Localized message shown when a submission is missing a field or has no key points.
pub const VALIDATION_MESSAGE: &str =
    "الرجاء ملء جميع الحقول وإضافة نقطة واحدة على الأقل في المحاور الأساسية.";

// ────────────────────────────────────────────────────────────────────────────
// Form input
// ────────────────────────────────────────────────────────────────────────────

/// Key points as submitted: either the raw textarea content or pre-split lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeyPointsInput {
    Text(String),
    Lines(Vec<String>),
}

impl Default for KeyPointsInput {
    fn default() -> Self {
        KeyPointsInput::Text(String::new())
    }
}

/// Raw submission body for POST /api/v1/reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportForm {
    #[serde(default)]
    pub module_title: String,
    #[serde(default)]
    pub session_number: String,
    #[serde(default)]
    pub key_points: KeyPointsInput,
}

/// A submission that passed validation. Immutable once handed to generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    module_title: String,
    session_number: String,
    key_points: Vec<String>,
}

/// Why a form was rejected. Only used for logging; the user sees `VALIDATION_MESSAGE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRejection {
    MissingModuleTitle,
    MissingSessionNumber,
    NoKeyPoints,
}

impl ReportRequest {
    /// Validates a form: both text fields non-blank and at least one non-blank key point.
    ///
    /// Blank and whitespace-only lines are dropped; kept lines are trimmed and keep
    /// their original order.
    pub fn from_form(form: ReportForm) -> Result<Self, FormRejection> {
        let module_title = form.module_title.trim().to_string();
        let session_number = form.session_number.trim().to_string();

        if module_title.is_empty() {
            return Err(FormRejection::MissingModuleTitle);
        }
        if session_number.is_empty() {
            return Err(FormRejection::MissingSessionNumber);
        }

        let key_points = split_key_points(form.key_points);
        if key_points.is_empty() {
            return Err(FormRejection::NoKeyPoints);
        }

        Ok(Self {
            module_title,
            session_number,
            key_points,
        })
    }

    pub fn module_title(&self) -> &str {
        &self.module_title
    }

    pub fn session_number(&self) -> &str {
        &self.session_number
    }

    pub fn key_points(&self) -> &[String] {
        &self.key_points
    }
}

fn split_key_points(input: KeyPointsInput) -> Vec<String> {
    let lines: Vec<String> = match input {
        KeyPointsInput::Text(text) => vec![text],
        KeyPointsInput::Lines(lines) => lines,
    };

    // Array elements may carry embedded newlines; each line is its own point.
    lines
        .iter()
        .flat_map(|entry| entry.split('\n'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Generated report
// ────────────────────────────────────────────────────────────────────────────

/// How the report body was obtained. The body of a `Fallback` report is the fixed
/// apology text, so this is the only reliable way to tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Generated,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedReport {
    pub report_id: Uuid,
    pub title: String,
    pub body: String,
    pub outcome: GenerationOutcome,
}

impl GeneratedReport {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Fallback { .. })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identity
// ────────────────────────────────────────────────────────────────────────────

/// Who the report belongs to. Loaded once at startup, never edited at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub full_name: String,
    pub rental_number: String,
    pub location: String,
}
