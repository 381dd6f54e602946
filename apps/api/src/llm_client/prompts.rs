// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting instructions.

/// Role line placed at the top of every report prompt.
pub const REPORT_WRITER_ROLE: &str = "أنت مساعد خبير في كتابة التقارير التكوينية الاحترافية.";

/// Keeps header material out of the body. The document adds name, date and
/// rental number itself.
pub const NO_HEADER_INSTRUCTION: &str = "لا تقم بتضمين العنوان أو معلومات الرأس (الاسم، التاريخ، رقم التأجير) في إجابتك، فقط قم بإنشاء نص التقرير الأساسي بشكل مباشر.";

/// Required shape of the body: introduction, elaboration, conclusion.
pub const STRUCTURE_INSTRUCTION: &str =
    "ابدأ التقرير بمقدمة مناسبة، ثم صلب الموضوع الذي يفصل النقاط المذكورة، واختتم بخاتمة موجزة.";
