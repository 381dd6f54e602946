//! Report Generation — prompt → Gemini → `GeneratedReport`.
//!
//! A failed call never reaches the caller as an error: the body becomes the fixed
//! apology text and `outcome` records why, so the preview always has something to show.

use tracing::{error, info};
use uuid::Uuid;

use crate::generation::prompts::build_report_prompt;
use crate::llm_client::GenerationClient;
use crate::models::report::{GeneratedReport, GenerationOutcome, ReportRequest};

/// Body substituted whenever the generation call fails.
pub const GENERATION_FALLBACK: &str = "عذرًا، حدث خطأ أثناء إنشاء التقرير. يرجى المحاولة مرة أخرى.";

/// `تقرير عن الحصة {session} من مجزوءة {module}`
pub fn report_title(request: &ReportRequest) -> String {
    format!(
        "تقرير عن الحصة {} من مجزوءة {}",
        request.session_number(),
        request.module_title()
    )
}

/// Runs one generation call. Exactly one request is sent per invocation.
pub async fn generate_report(
    client: &dyn GenerationClient,
    request: &ReportRequest,
) -> GeneratedReport {
    let report_id = Uuid::new_v4();
    let prompt = build_report_prompt(request);
    info!(
        "Generating report {} ({} key points)",
        report_id,
        request.key_points().len()
    );

    let (body, outcome) = match client.generate(&prompt).await {
        Ok(text) => (text, GenerationOutcome::Generated),
        Err(e) => {
            error!("Error generating report {report_id} from Gemini API: {e}");
            (
                GENERATION_FALLBACK.to_string(),
                GenerationOutcome::Fallback {
                    reason: e.to_string(),
                },
            )
        }
    };

    GeneratedReport {
        report_id,
        title: report_title(request),
        body,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::report::{KeyPointsInput, ReportForm};
    use async_trait::async_trait;

    struct Canned(Result<&'static str, u16>);

    #[async_trait]
    impl GenerationClient for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(LlmError::Api {
                    status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    fn sample_request() -> ReportRequest {
        ReportRequest::from_form(ReportForm {
            module_title: "التربية الدامجة".to_string(),
            session_number: "1".to_string(),
            key_points: KeyPointsInput::Lines(vec![
                "النقطة الأولى".to_string(),
                "النقطة الثانية".to_string(),
            ]),
        })
        .unwrap()
    }

    #[test]
    fn test_title_is_derived_from_module_and_session() {
        assert_eq!(
            report_title(&sample_request()),
            "تقرير عن الحصة 1 من مجزوءة التربية الدامجة"
        );
    }

    #[tokio::test]
    async fn test_successful_call_keeps_model_text() {
        let report = generate_report(&Canned(Ok("مقدمة\n\nخاتمة")), &sample_request()).await;
        assert_eq!(report.body, "مقدمة\n\nخاتمة");
        assert_eq!(report.outcome, GenerationOutcome::Generated);
        assert!(!report.is_fallback());
    }

    #[tokio::test]
    async fn test_failed_call_yields_fallback_body() {
        let report = generate_report(&Canned(Err(503)), &sample_request()).await;
        assert_eq!(report.body, GENERATION_FALLBACK);
        assert_eq!(report.title, "تقرير عن الحصة 1 من مجزوءة التربية الدامجة");
        match &report.outcome {
            GenerationOutcome::Fallback { reason } => assert!(reason.contains("503")),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_each_generation_gets_a_fresh_id() {
        let client = Canned(Ok("x"));
        let a = generate_report(&client, &sample_request()).await;
        let b = generate_report(&client, &sample_request()).await;
        assert_ne!(a.report_id, b.report_id);
    }
}
