pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::updates::handlers as updates;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/resumes/upload", post(resumes::handle_upload))
        .route("/api/resumes/download", post(resumes::handle_download))
        .route("/api/resumes/parse", post(resumes::handle_parse))
        .route("/api/resumes/analyze", post(resumes::handle_analyze))
        // Updates API
        .route("/api/updates/update", post(updates::handle_tailor))
        .route("/api/updates/generate", post(updates::handle_cover_letter))
        .layer(body_limit)
        .with_state(state)
}
