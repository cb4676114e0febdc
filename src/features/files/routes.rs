use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::files::handlers::{display_file, download_file, upload_file, upload_page};
use crate::features::files::services::FileRepository;
use crate::features::files::validation::UploadPolicy;

/// Shared state for the files routes
#[derive(Clone)]
pub struct FilesState {
    pub repository: Arc<dyn FileRepository>,
    pub policy: Arc<UploadPolicy>,
}

/// Create routes for the files feature
pub fn routes(state: FilesState) -> Router {
    // Allow body size up to the policy maximum plus buffer for multipart overhead
    let body_limit = state.policy.max_bytes() + 1024 * 1024;

    Router::new()
        .route(
            "/",
            get(upload_page)
                .post(upload_file)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/download/{file_id}", get(download_file))
        .route("/file/{file_id}", get(display_file))
        .with_state(state)
}
