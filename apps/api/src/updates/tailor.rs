//! Rewrites a resume using the feedback from a previous analysis.

use serde::{Deserialize, Serialize};

use crate::cache::{Family, Fingerprint, ResponseCache};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{CompletionRequest, CompletionService};
use crate::resumes::analyze::non_blank;
use crate::updates::prompts::{TAILOR_MAX_TOKENS, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};

#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    pub analysis: Option<String>,
    #[serde(rename = "currentResumeText")]
    pub current_resume_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorResponse {
    pub success: bool,
    #[serde(rename = "tailoredResume")]
    pub tailored_resume: String,
}

pub async fn tailor_resume(
    cache: &ResponseCache,
    llm: &dyn CompletionService,
    request: &TailorRequest,
) -> Result<TailorResponse, AppError> {
    let (Some(analysis), Some(resume)) = (
        non_blank(&request.analysis),
        non_blank(&request.current_resume_text),
    ) else {
        return Err(AppError::Validation(
            "analysis and currentResumeText are required.".to_string(),
        ));
    };

    let key = Fingerprint::of_fields(Family::Tailor, &[analysis, resume]);

    cache
        .get_or_compute(&key, || async move {
            let prompt = fill(
                TAILOR_PROMPT_TEMPLATE,
                &[
                    ("analysis", analysis),
                    ("current_resume_text", resume),
                    ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
                ],
            );

            let output = llm
                .complete(CompletionRequest {
                    system: TAILOR_SYSTEM,
                    prompt: &prompt,
                    max_tokens: TAILOR_MAX_TOKENS,
                })
                .await
                .map_err(|e| AppError::llm("Failed to generate tailored resume.", e))?;

            Ok(TailorResponse {
                success: true,
                tailored_resume: output.trim().to_string(),
            })
        })
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::MemoryCache;
    use crate::llm_client::testing::ScriptedCompletion;

    fn request(analysis: Option<&str>, resume: Option<&str>) -> TailorRequest {
        TailorRequest {
            analysis: analysis.map(String::from),
            current_resume_text: resume.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_tailor_trims_and_caches() {
        let cache = ResponseCache::new(Arc::new(MemoryCache::new()));
        let llm = ScriptedCompletion::replying("\n  JANE DOE\nSkills: Rust, Kubernetes  \n");
        let req = request(Some("Add Kubernetes"), Some("JANE DOE\nSkills: Rust"));

        let first = tailor_resume(&cache, &llm, &req).await.unwrap();
        let second = tailor_resume(&cache, &llm, &req).await.unwrap();

        assert_eq!(first.tailored_resume, "JANE DOE\nSkills: Rust, Kubernetes");
        assert_eq!(second.tailored_resume, first.tailored_resume);
        assert_eq!(llm.calls(), 1);

        let (system, prompt, max_tokens) = llm.last_request().unwrap();
        assert_eq!(system, TAILOR_SYSTEM);
        assert_eq!(max_tokens, TAILOR_MAX_TOKENS);
        assert!(prompt.contains("Add Kubernetes"));
    }

    #[tokio::test]
    async fn test_tailor_requires_both_fields() {
        let cache = ResponseCache::new(Arc::new(MemoryCache::new()));
        let llm = ScriptedCompletion::replying("unused");

        for req in [
            request(None, Some("resume")),
            request(Some("feedback"), None),
            request(Some(""), Some("resume")),
        ] {
            let err = tailor_resume(&cache, &llm, &req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert_eq!(llm.calls(), 0);
    }
}
