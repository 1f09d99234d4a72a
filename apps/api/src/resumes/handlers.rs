//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::{AppError, AppJson};
use crate::resumes::analyze::{analyze_resume, AnalyzeResponse, JobFitRequest};
use crate::resumes::download::{download_resume, DownloadRequest, DownloadResponse};
use crate::resumes::parse::{parse_resume, ParseRequest, ParseResponse};
use crate::resumes::upload::{upload_resume, UploadResponse, UploadedFile};
use crate::state::AppState;

/// Multipart field that carries the resume.
const FILE_FIELD: &str = "file";

/// POST /api/resumes/upload
///
/// Multipart body with a `file` field. Returns the stored object's public URL.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut uploaded = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        uploaded = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let file = uploaded.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let response = upload_resume(&state.cache, state.store.as_ref(), file).await?;
    Ok(Json(response))
}

/// POST /api/resumes/download
///
/// Copies `fileUrl` into the scratch directory. Rejected while another
/// download is in flight.
pub async fn handle_download(
    State(state): State<AppState>,
    AppJson(request): AppJson<DownloadRequest>,
) -> Result<Json<DownloadResponse>, AppError> {
    let file_url = request.file_url.unwrap_or_default();
    let response = download_resume(
        &state.cache,
        &state.download_guard,
        state.store.as_ref(),
        &state.scratch_dir,
        &file_url,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    let file_path = request.file_path.unwrap_or_default();
    let response = parse_resume(
        &state.cache,
        &state.extractors,
        state.sections.clone(),
        &file_path,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/resumes/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<JobFitRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = analyze_resume(&state.cache, state.llm.as_ref(), &request).await?;
    Ok(Json(response))
}
