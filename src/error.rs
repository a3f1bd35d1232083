use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Job not found")]
    JobNotFound,

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from the conversion pipeline itself.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Rasterization error: {0}")]
    Rasterize(#[from] RasterizeError),

    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("Screening error: {0}")]
    Screen(#[from] rip_dither::ScreenError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the Ghostscript subprocess.
#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("Ghostscript executable not found: {0}")]
    GhostscriptNotFound(String),

    #[error("Ghostscript exited with status {status}: {stderr}")]
    GhostscriptFailed { status: i32, stderr: String },

    #[error("Invalid DPI specification: {0}")]
    InvalidDpi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::JobNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Process(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
