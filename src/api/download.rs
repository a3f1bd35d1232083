//! `GET /download/:id`: the finished container file as an attachment.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::server::AppState;

pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let job = state.jobs.get(&id).ok_or(ApiError::JobNotFound)?;

    let bytes = tokio::fs::read(&job.final_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Output file unreadable: {e}")))?;

    let content_type = if job.filename.ends_with(".bmp") {
        "image/bmp"
    } else {
        "image/tiff"
    };

    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", job.filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
