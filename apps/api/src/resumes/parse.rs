//! Parse workflow: extract text from a local resume and split out its skills
//! and experience sections.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{Family, Fingerprint, ResponseCache};
use crate::errors::AppError;
use crate::resumes::extractors::{ExtractError, ExtractorRegistry};
use crate::resumes::sections::{normalize, SectionExtractor};

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResponse {
    pub message: String,
    pub skills: String,
    pub experience: String,
}

/// Lowercase extension with its leading dot, or an empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

pub async fn parse_resume(
    cache: &ResponseCache,
    extractors: &ExtractorRegistry,
    sections: Arc<dyn SectionExtractor>,
    file_path: &str,
) -> Result<ParseResponse, AppError> {
    if file_path.trim().is_empty() {
        return Err(AppError::Validation("File path is required".to_string()));
    }

    let path = Path::new(file_path);
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(AppError::Validation("File does not exist".to_string()));
    }

    let extension = extension_of(path);
    let extractor = extractors
        .for_extension(&extension)
        .ok_or_else(|| AppError::Validation("Unsupported file type".to_string()))?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {file_path}: {e}"))?;
    let key = Fingerprint::of_bytes(Family::Parse, &bytes);

    cache
        .get_or_compute(&key, || async move {
            let size = bytes.len();
            let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
                .await
                .map_err(|_| ExtractError::Panicked)??;
            debug!(
                "Extracted {} chars from {file_path} ({size} bytes)",
                text.len()
            );

            let found = sections.extract(&normalize(&text));
            Ok(ParseResponse {
                message: "File parsed successfully".to_string(),
                skills: found.skills,
                experience: found.experience,
            })
        })
        .await
}
