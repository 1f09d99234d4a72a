// Resume tailoring and cover-letter generation.
// All LLM calls go through llm_client. No direct provider calls here.

pub mod cover_letter;
pub mod handlers;
pub mod prompts;
pub mod tailor;
