//! Upload workflow: store a resume in object storage, deduplicated by content.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{Family, Fingerprint, ResponseCache};
use crate::errors::AppError;
use crate::storage::{upload_key, ObjectStore};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub url: String,
}

/// Stores `file` and returns its public URL. Re-uploading identical bytes
/// returns the URL of the first upload while its cache entry lives.
pub async fn upload_resume(
    cache: &ResponseCache,
    store: &dyn ObjectStore,
    file: UploadedFile,
) -> Result<UploadResponse, AppError> {
    if file.bytes.is_empty() {
        return Err(AppError::Validation("No file uploaded".to_string()));
    }

    let key = Fingerprint::of_bytes(Family::Upload, &file.bytes);

    cache
        .get_or_compute(&key, || async move {
            let object_key = upload_key(&file.file_name, chrono::Utc::now().timestamp_millis());
            let content_type = file.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
            let size = file.bytes.len();

            let url = store
                .put(&object_key, file.bytes.clone(), content_type)
                .await
                .map_err(|e| AppError::storage("Failed to upload file", e))?;

            info!("Stored upload '{}' ({size} bytes) at {url}", file.file_name);
            Ok(UploadResponse {
                message: "File uploaded successfully".to_string(),
                url,
            })
        })
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::testing::MemoryObjectStore;

    fn file(bytes: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: "resume.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[tokio::test]
    async fn test_identical_bytes_upload_once() {
        let cache = ResponseCache::new(Arc::new(MemoryCache::new()));
        let store = MemoryObjectStore::new();

        let first = upload_resume(&cache, &store, file(b"%PDF-1.4 one")).await.unwrap();
        let second = upload_resume(&cache, &store, file(b"%PDF-1.4 one")).await.unwrap();

        assert_eq!(first.url, second.url);
        assert_eq!(store.puts(), 1);
        assert!(first.url.contains("/uploads/"));
        assert!(first.url.ends_with("-resume.pdf"));
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let cache = ResponseCache::new(Arc::new(MemoryCache::new()));
        let store = MemoryObjectStore::new();

        let err = upload_resume(&cache, &store, file(b"")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.puts(), 0);
    }
}
