use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::llm_client::CompletionService;
use crate::resumes::extractors::ExtractorRegistry;
use crate::resumes::guard::DownloadGuard;
use crate::resumes::sections::SectionExtractor;
use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every external collaborator sits behind a trait object so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub cache: ResponseCache,
    /// Process-wide single-flight lease for the download workflow.
    pub download_guard: DownloadGuard,
    pub store: Arc<dyn ObjectStore>,
    pub extractors: ExtractorRegistry,
    /// Pluggable section heuristic. Default: RegexSectionExtractor.
    pub sections: Arc<dyn SectionExtractor>,
    pub llm: Arc<dyn CompletionService>,
    pub scratch_dir: PathBuf,
    pub max_upload_bytes: usize,
}
