//! `POST /process`: upload a PDF, get back a job id.
//!
//! The request is `multipart/form-data` with a required `file` field
//! and optional `format`, `bit_depth`, `dpi`, `noise` and `seed`
//! fields. The conversion runs on the blocking pool because
//! Ghostscript plus screening takes seconds at print resolutions.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ProcessError, RasterizeError};
use crate::server::AppState;
use crate::services::{convert_to_temp, ConversionRequest, Dpi, Job, OutputFormat};

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub id: String,
    pub filename: String,
    /// Page dimensions in pixels at the rasterized resolution.
    pub width: usize,
    pub height: usize,
    pub preview_url: String,
    pub download_url: String,
}

pub async fn handle_process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut pdf_bytes = None;
    let mut original_name = None;
    let mut format = OutputFormat::Tiff;
    let mut bit_depth = 1u8;
    let mut dpi: Option<Dpi> = None;
    let mut noise = 0.0f32;
    let mut seed = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                original_name = field.file_name().map(str::to_string);
                pdf_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                );
            }
            "format" => {
                let text = field_text(field).await?;
                format = text
                    .parse()
                    .map_err(|e: ProcessError| ApiError::BadRequest(e.to_string()))?;
            }
            "bit_depth" => {
                let text = field_text(field).await?;
                bit_depth = text
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid bit depth: {text}")))?;
            }
            "dpi" => {
                let text = field_text(field).await?;
                dpi = Some(
                    text.parse()
                        .map_err(|e: RasterizeError| ApiError::BadRequest(e.to_string()))?,
                );
            }
            "noise" => {
                let text = field_text(field).await?;
                noise = text
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid noise value: {text}")))?;
            }
            "seed" => {
                let text = field_text(field).await?;
                seed = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| ApiError::BadRequest(format!("Invalid seed: {text}")))?,
                );
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let bytes = pdf_bytes.ok_or_else(|| ApiError::BadRequest("Missing file field".to_string()))?;
    let name = original_name.unwrap_or_else(|| "upload.pdf".to_string());
    if !name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(ApiError::BadRequest(
            "Only PDF uploads are supported".to_string(),
        ));
    }

    // Spool the upload to disk for Ghostscript; the temp file lives
    // until the handler returns.
    let upload = tempfile::Builder::new()
        .prefix("riptone-upload-")
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    tokio::fs::write(upload.path(), &bytes)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let request = ConversionRequest {
        bit_depth,
        format,
        dpi: dpi.unwrap_or(Dpi::Symmetric(state.config.default_dpi)),
        noise,
        seed,
    };
    tracing::info!(
        filename = %name,
        bit_depth,
        format = format.extension(),
        ?dpi,
        noise,
        "Conversion requested"
    );

    let config = state.config.clone();
    let pdf_path = upload.path().to_path_buf();
    let artifacts =
        tokio::task::spawn_blocking(move || convert_to_temp(&config, &pdf_path, &request))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    let filename = crate::services::processor::download_filename(&name, format);
    let id = state.jobs.insert(Job {
        final_path: artifacts.final_path,
        preview_path: artifacts.preview_path,
        filename: filename.clone(),
    });

    Ok(Json(ProcessResponse {
        preview_url: format!("/preview/{id}"),
        download_url: format!("/download/{id}"),
        id,
        filename,
        width: artifacts.width,
        height: artifacts.height,
    }))
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
