//! Prompt Builder — turns a validated `ReportRequest` into the generation prompt.

use crate::llm_client::prompts::{NO_HEADER_INSTRUCTION, REPORT_WRITER_ROLE, STRUCTURE_INSTRUCTION};
use crate::models::report::ReportRequest;

/// Report prompt template.
/// Replace: {role}, {module_title}, {session_number}, {key_points},
///          {no_header_instruction}, {structure_instruction}
pub const REPORT_PROMPT_TEMPLATE: &str = "{role}
مهمتك هي كتابة تقرير يومي مفصل ومنسق باللغة العربية الفصحى بناءً على المعطيات التالية:

- مجزوءة التكوين: {module_title}
- رقم الحصة: {session_number}
- النقاط والمحاور الرئيسية التي تمت تغطيتها:
{key_points}

الرجاء كتابة نص تقرير شامل يربط بين هذه النقاط ويوسعها بأسلوب أكاديمي ومنهجي، كما لو أنك المتدرب الذي حضر الحصة ويدون ملاحظاته. يجب أن يكون النص غنياً بالمعلومات ومفيداً.
{no_header_instruction}
{structure_instruction}";

const BULLET: &str = "- ";

/// Renders key points as one `- point` line each, in order.
pub fn render_key_points(points: &[String]) -> String {
    points
        .iter()
        .map(|p| format!("{BULLET}{p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_report_prompt(request: &ReportRequest) -> String {
    let key_points = render_key_points(request.key_points());
    fill_template(
        REPORT_PROMPT_TEMPLATE,
        &[
            ("role", REPORT_WRITER_ROLE),
            ("module_title", request.module_title()),
            ("session_number", request.session_number()),
            ("key_points", key_points.as_str()),
            ("no_header_instruction", NO_HEADER_INSTRUCTION),
            ("structure_instruction", STRUCTURE_INSTRUCTION),
        ],
    )
}

/// Single-pass `{name}` substitution. Substituted values are never rescanned, so
/// braces typed by the user stay literal.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = vars.iter().find_map(|(name, value)| {
            tail.strip_prefix(name)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
