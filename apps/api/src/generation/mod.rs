// Report generation: prompt assembly, the Gemini call, and the HTTP handlers.
// All LLM calls go through llm_client — no direct API calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
