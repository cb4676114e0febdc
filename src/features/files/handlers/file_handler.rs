use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::error::AppError;
use crate::features::files::dtos::FileRowDto;
use crate::features::files::routes::FilesState;
use crate::shared::constants::RECENT_FILES_LIMIT;
use crate::shared::templates::render_template;

/// Query flag set by the post-upload redirect; shows the one-time
/// success notice and disappears on the next navigation.
#[derive(Debug, Deserialize)]
pub struct UploadPageQuery {
    pub uploaded: Option<String>,
}

/// Render the listing page: the recent uploads, the upload form, and any
/// inline form error or one-time notice.
async fn render_upload_page(
    state: &FilesState,
    error: Option<String>,
    notice: Option<&str>,
) -> Result<Html<String>, AppError> {
    let files = state.repository.list_recent(RECENT_FILES_LIMIT).await?;
    let rows: Vec<FileRowDto> = files.iter().map(FileRowDto::from).collect();

    let html = render_template(
        "upload.html",
        context! {
            files => rows,
            error => error,
            notice => notice,
            allowed_types => state.policy.allowed_types(),
            max_upload_mb => state.policy.max_megabytes(),
        },
    )?;

    Ok(Html(html))
}

/// Upload page
///
/// Lists the most recent uploads with an empty upload form.
pub async fn upload_page(
    State(state): State<FilesState>,
    Query(query): Query<UploadPageQuery>,
) -> Result<Html<String>, AppError> {
    let notice = query
        .uploaded
        .is_some()
        .then_some("File uploaded successfully!");
    render_upload_page(&state, None, notice).await
}

/// Handle an upload submission
///
/// Accepts multipart/form-data with a single `file` field. A payload the
/// policy turns away is re-rendered inline on the form with an HTTP
/// success status; an accepted payload is persisted and answered with a
/// redirect so a refresh does not re-submit the form.
pub async fn upload_file(
    State(state): State<FilesState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                // The declared content type is trusted as-is
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                upload = Some((file_name, content_type, data.to_vec()));
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let Some((file_name, content_type, data)) = upload else {
        let page = render_upload_page(&state, Some("No file was submitted.".to_string()), None)
            .await?;
        return Ok(page.into_response());
    };

    // Rejections stay on the form with a success status; they are user
    // errors, not request errors
    if let Err(rejection) = state.policy.check(&content_type, data.len()) {
        debug!(
            "Upload rejected: name={}, content_type={}, size={}: {}",
            file_name,
            content_type,
            data.len(),
            rejection
        );
        let page = render_upload_page(&state, Some(rejection.to_string()), None).await?;
        return Ok(page.into_response());
    }

    let file = state
        .repository
        .insert(&file_name, data, &content_type)
        .await?;

    info!("File uploaded: id={}, name={}", file.id, file.name);

    Ok(Redirect::to("/?uploaded=1").into_response())
}

/// Download a file as an attachment
///
/// The disposition header forces a save prompt instead of inline rendering.
pub async fn download_file(
    State(state): State<FilesState>,
    Path(file_id): Path<i64>,
) -> Result<Response, AppError> {
    let file = state
        .repository
        .fetch_by_id(file_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_id)))?;

    let disposition = format!("attachment; filename=\"{}\"", file.name);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response())
}

/// Serve a file inline for embedding as an `<img>` source
pub async fn display_file(
    State(state): State<FilesState>,
    Path(file_id): Path<i64>,
) -> Result<Response, AppError> {
    let file = state
        .repository
        .fetch_by_id(file_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_id)))?;

    Ok(([(header::CONTENT_TYPE, file.content_type)], file.content).into_response())
}
