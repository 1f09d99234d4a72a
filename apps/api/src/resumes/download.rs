//! Download workflow: copy a remote resume into the local scratch directory.
//!
//! Only one download runs its fetch phase at a time (see [`DownloadGuard`]).
//! The scratch directory holds the most recent download only; each fresh
//! download clears it first.

use std::path::Path;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{Family, Fingerprint, ResponseCache};
use crate::errors::AppError;
use crate::resumes::guard::DownloadGuard;
use crate::storage::ObjectStore;

pub const ALREADY_DOWNLOADING: &str =
    "A file is already being downloaded. Please try again later.";

/// Upload keys are prefixed `<unix-millis>-`; the local copy drops it.
static TIMESTAMP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-").expect("valid regex literal"));

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(rename = "fileUrl")]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub message: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

pub async fn download_resume(
    cache: &ResponseCache,
    guard: &DownloadGuard,
    store: &dyn ObjectStore,
    scratch_dir: &Path,
    file_url: &str,
) -> Result<DownloadResponse, AppError> {
    if file_url.trim().is_empty() {
        return Err(AppError::Validation("File URL is required".to_string()));
    }

    let key = Fingerprint::of_url(Family::Download, file_url);

    // A hit reports where this URL was saved. A later download may have cleared
    // that file from the scratch directory since; the entry still stands.
    if let Some(hit) = cache.lookup::<DownloadResponse>(&key).await {
        info!("Cache hit for {key}");
        return Ok(hit);
    }

    let Some(permit) = guard.try_acquire() else {
        warn!("Rejecting download of {file_url}: another download holds the lease");
        return Err(AppError::Conflict(ALREADY_DOWNLOADING.to_string()));
    };
    debug!("Fetching {file_url} under lease {}", permit.token());

    let response = fetch_into_scratch(store, scratch_dir, file_url).await?;

    // Held until the entry is written: a repeat request either hits or is rejected.
    cache.store(&key, &response).await;
    drop(permit);

    Ok(response)
}

async fn fetch_into_scratch(
    store: &dyn ObjectStore,
    scratch_dir: &Path,
    file_url: &str,
) -> Result<DownloadResponse, AppError> {
    clear_scratch_dir(scratch_dir).await;

    let file_name = resolve_file_name(file_url)
        .ok_or_else(|| AppError::Download("Error decoding file name".to_string()))?;
    let local_path = scratch_dir.join(&file_name);
    info!("Downloading {file_url} to {}", local_path.display());

    let body = store
        .fetch(file_url)
        .await
        .map_err(|e| AppError::storage("Failed to download file", e))?;

    tokio::fs::write(&local_path, &body).await.map_err(|e| {
        warn!("Writing {} failed: {e}", local_path.display());
        AppError::Download("Failed to download file".to_string())
    })?;

    info!("Saved {} bytes to {}", body.len(), local_path.display());
    Ok(DownloadResponse {
        message: "File downloaded and saved successfully".to_string(),
        file_path: local_path.to_string_lossy().into_owned(),
    })
}

/// Creates `dir` if needed and removes the files a previous download left.
/// Failures are logged; a dirty scratch directory does not block a download.
async fn clear_scratch_dir(dir: &Path) {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!("Failed to create scratch directory {}: {e}", dir.display());
        return;
    }

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to list scratch directory {}: {e}", dir.display());
            return;
        }
    };

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
                if is_file {
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        warn!("Failed to remove stale file {}: {e}", path.display());
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read scratch directory {}: {e}", dir.display());
                break;
            }
        }
    }
}

/// Local file name for `file_url`: the percent-decoded last path segment,
/// minus any upload timestamp prefix. `None` when nothing usable remains.
pub fn resolve_file_name(file_url: &str) -> Option<String> {
    let url = Url::parse(file_url).ok()?;
    let last_segment = url.path_segments()?.next_back()?;
    let decoded = percent_decode_str(last_segment).decode_utf8().ok()?;
    let stripped = TIMESTAMP_PREFIX.replace(&decoded, "");

    let sanitized: String = stripped
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let name = sanitized.trim();

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
