//! `GET /preview/:id`: the bounded preview PNG for a finished job.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::server::AppState;

pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let job = state.jobs.get(&id).ok_or(ApiError::JobNotFound)?;

    let bytes = tokio::fs::read(&job.preview_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Preview file unreadable: {e}")))?;

    Ok(([(CONTENT_TYPE, "image/png")], bytes).into_response())
}
