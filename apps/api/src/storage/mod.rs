//! Remote object storage for uploaded resumes.
//!
//! Uploads go to an S3-compatible bucket (MinIO locally). Downloads fetch any
//! public URL over HTTP, which covers objects this service stored as well as
//! links supplied by the client.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 upload failed: {0}")]
    Upload(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch of {url} returned status {status}")]
    Status { url: String, status: u16 },
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `body` under `key` and returns its durable public URL.
    async fn put(&self, key: &str, body: Bytes, content_type: &str)
        -> Result<String, StorageError>;

    /// Fetches the full body behind `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes, StorageError>;
}

pub struct S3ObjectStore {
    s3: aws_sdk_s3::Client,
    http: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(
        s3: aws_sdk_s3::Client,
        bucket: String,
        public_base_url: String,
        fetch_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self {
            s3,
            http,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(self.public_url(key))
    }

    async fn fetch(&self, url: &str) -> Result<Bytes, StorageError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

/// Object key for an upload: `uploads/<unix-millis>-<name>`.
///
/// The name keeps only its final path component. Characters outside
/// `[A-Za-z0-9._-]` become `_`, since the key is embedded in a public URL.
pub fn upload_key(original_name: &str, now_millis: i64) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if sanitized.trim_matches('.').is_empty() {
        "resume".to_string()
    } else {
        sanitized
    };
    format!("uploads/{now_millis}-{name}")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Keeps objects in memory and serves `fetch` from a fixed URL table.
    /// `fetch_delay` lets tests hold a download in its fetch phase.
    #[derive(Default)]
    pub struct MemoryObjectStore {
        remote: Mutex<HashMap<String, Bytes>>,
        puts: AtomicUsize,
        fetches: AtomicUsize,
        fetch_delay: Option<Duration>,
    }

    impl MemoryObjectStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_remote(self, url: &str, body: &[u8]) -> Self {
            self.remote
                .lock()
                .unwrap()
                .insert(url.to_string(), Bytes::copy_from_slice(body));
            self
        }

        pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
            self.fetch_delay = Some(delay);
            self
        }

        pub fn puts(&self) -> usize {
            self.puts.load(Ordering::SeqCst)
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryObjectStore {
        async fn put(
            &self,
            key: &str,
            body: Bytes,
            _content_type: &str,
        ) -> Result<String, StorageError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            let url = format!("http://objects.test/bucket/{key}");
            self.remote.lock().unwrap().insert(url.clone(), body);
            Ok(url)
        }

        async fn fetch(&self, url: &str) -> Result<Bytes, StorageError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.fetch_delay {
                tokio::time::sleep(delay).await;
            }
            let body = self.remote.lock().unwrap().get(url).cloned();
            body.ok_or_else(|| StorageError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_key_prefixes_timestamp() {
        assert_eq!(
            upload_key("resume.pdf", 1700000000000),
            "uploads/1700000000000-resume.pdf"
        );
    }

    #[test]
    fn test_upload_key_strips_directories_and_spaces() {
        assert_eq!(
            upload_key("C:\\docs\\My Resume (final).pdf", 1),
            "uploads/1-My_Resume__final_.pdf"
        );
        assert_eq!(upload_key("../../etc/passwd", 1), "uploads/1-passwd");
    }

    #[test]
    fn test_upload_key_falls_back_for_empty_names() {
        assert_eq!(upload_key("", 7), "uploads/7-resume");
        assert_eq!(upload_key("..", 7), "uploads/7-resume");
    }
}
