//! Drafts a cover letter from resume sections and a job description.

use serde::{Deserialize, Serialize};

use crate::cache::{Family, ResponseCache};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill, strip_asterisks, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{CompletionRequest, CompletionService};
use crate::resumes::analyze::JobFitRequest;
use crate::updates::prompts::{
    COVER_LETTER_MAX_TOKENS, COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterResponse {
    pub success: bool,
    #[serde(rename = "coverLetter")]
    pub cover_letter: String,
}

pub async fn generate_cover_letter(
    cache: &ResponseCache,
    llm: &dyn CompletionService,
    request: &JobFitRequest,
) -> Result<CoverLetterResponse, AppError> {
    let fit = request.validate()?;
    let key = fit.fingerprint(Family::CoverLetter);

    cache
        .get_or_compute(&key, || async move {
            let prompt = fill(
                COVER_LETTER_PROMPT_TEMPLATE,
                &[
                    ("skills", fit.skills),
                    ("experience", fit.experience),
                    ("job_description", fit.job_description),
                    ("requirements", fit.requirements),
                    ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
                ],
            );

            let output = llm
                .complete(CompletionRequest {
                    system: COVER_LETTER_SYSTEM,
                    prompt: &prompt,
                    max_tokens: COVER_LETTER_MAX_TOKENS,
                })
                .await
                .map_err(|e| AppError::llm("Failed to generate cover letter.", e))?;

            Ok(CoverLetterResponse {
                success: true,
                cover_letter: strip_asterisks(&output).trim().to_string(),
            })
        })
        .await
}
