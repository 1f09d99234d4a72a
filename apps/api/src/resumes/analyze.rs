//! Analyze workflow: score a resume's extracted sections against a job.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::{Family, Fingerprint, ResponseCache};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill, strip_asterisks, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{CompletionRequest, CompletionService};
use crate::resumes::prompts::{ANALYZE_MAX_TOKENS, ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};

static MATCH_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Match Score:\s*\d+/\d+").expect("valid regex literal"));

/// Resume sections plus the job they are measured against.
/// Shared by the analyze and cover-letter endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct JobFitRequest {
    pub skills: Option<String>,
    pub experience: Option<String>,
    #[serde(rename = "JobDescription")]
    pub job_description: Option<String>,
    #[serde(rename = "Requirements")]
    pub requirements: Option<String>,
}

/// Validated view of a [`JobFitRequest`].
#[derive(Debug, Clone, Copy)]
pub struct JobFit<'a> {
    pub skills: &'a str,
    pub experience: &'a str,
    pub job_description: &'a str,
    pub requirements: &'a str,
}

impl JobFitRequest {
    /// Requires non-blank skills and experience. Missing job fields read as empty.
    pub fn validate(&self) -> Result<JobFit<'_>, AppError> {
        match (non_blank(&self.skills), non_blank(&self.experience)) {
            (Some(skills), Some(experience)) => Ok(JobFit {
                skills,
                experience,
                job_description: self.job_description.as_deref().unwrap_or_default(),
                requirements: self.requirements.as_deref().unwrap_or_default(),
            }),
            _ => Err(AppError::Validation(
                "Skills and experience are required.".to_string(),
            )),
        }
    }
}

impl JobFit<'_> {
    pub fn fingerprint(&self, family: Family) -> Fingerprint {
        Fingerprint::of_fields(
            family,
            &[
                self.skills,
                self.experience,
                self.job_description,
                self.requirements,
            ],
        )
    }
}

pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(rename = "matchScore")]
    pub match_score: String,
    pub analysis: String,
}

/// Splits model output into `("Match Score: N/M", analysis)`. `None` when the
/// score line is missing or nothing follows it.
pub fn split_match_score(output: &str) -> Option<(String, String)> {
    let cleaned = strip_asterisks(output);
    let score = MATCH_SCORE.find(&cleaned)?;
    let analysis = cleaned[score.end()..].trim_start();
    if analysis.is_empty() {
        return None;
    }
    Some((score.as_str().to_string(), analysis.to_string()))
}

pub async fn analyze_resume(
    cache: &ResponseCache,
    llm: &dyn CompletionService,
    request: &JobFitRequest,
) -> Result<AnalyzeResponse, AppError> {
    let fit = request.validate()?;
    let key = fit.fingerprint(Family::Analyze);

    cache
        .get_or_compute(&key, || async move {
            let prompt = fill(
                ANALYZE_PROMPT_TEMPLATE,
                &[
                    ("job_description", fit.job_description),
                    ("requirements", fit.requirements),
                    ("skills", fit.skills),
                    ("experience", fit.experience),
                    ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
                ],
            );

            let output = llm
                .complete(CompletionRequest {
                    system: ANALYZE_SYSTEM,
                    prompt: &prompt,
                    max_tokens: ANALYZE_MAX_TOKENS,
                })
                .await
                .map_err(|e| AppError::llm("Language model request failed.", e))?;

            let (match_score, analysis) = split_match_score(&output).ok_or_else(|| AppError::Llm {
                message: "Match Score not found in the response".to_string(),
                source: None,
            })?;

            Ok(AnalyzeResponse {
                success: true,
                match_score,
                analysis,
            })
        })
        .await
}
