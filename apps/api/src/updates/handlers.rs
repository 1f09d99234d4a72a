//! Axum route handlers for the Updates API.

use axum::{extract::State, Json};

use crate::errors::{AppError, AppJson};
use crate::resumes::analyze::JobFitRequest;
use crate::state::AppState;
use crate::updates::cover_letter::{generate_cover_letter, CoverLetterResponse};
use crate::updates::tailor::{tailor_resume, TailorRequest, TailorResponse};

/// POST /api/updates/update
///
/// Rewrites `currentResumeText` using the feedback in `analysis`.
pub async fn handle_tailor(
    State(state): State<AppState>,
    AppJson(request): AppJson<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let response = tailor_resume(&state.cache, state.llm.as_ref(), &request).await?;
    Ok(Json(response))
}

/// POST /api/updates/generate
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    AppJson(request): AppJson<JobFitRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let response = generate_cover_letter(&state.cache, state.llm.as_ref(), &request).await?;
    Ok(Json(response))
}
