// Resume intake: upload, download, parse and job-fit analysis.
// Each workflow checks its inputs before touching the response cache.

pub mod analyze;
pub mod download;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod parse;
pub mod prompts;
pub mod sections;
pub mod upload;
