//! End-to-end conversion pipeline.
//!
//! Glues the stages together: Ghostscript renders the PDF page to an
//! intermediate grayscale PNG, the screening core quantizes it, and a
//! container writer plus a preview PNG land on disk.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rip_dither::{PixelBuffer, PreviewImage, Screener};

use crate::container::{write_bmp, write_tiff};
use crate::error::ProcessError;
use crate::models::AppConfig;
use crate::services::rasterizer::{Dpi, Rasterizer};

/// Supported output containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tiff,
    Bmp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tiff => "tiff",
            OutputFormat::Bmp => "bmp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            "bmp" => Ok(OutputFormat::Bmp),
            other => Err(ProcessError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Everything one conversion needs besides the PDF itself.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub bit_depth: u8,
    pub format: OutputFormat,
    pub dpi: Dpi,
    pub noise: f32,
    pub seed: Option<u64>,
}

/// Where a finished conversion landed.
#[derive(Debug, Clone)]
pub struct ConversionArtifacts {
    pub final_path: PathBuf,
    pub preview_path: PathBuf,
    pub width: usize,
    pub height: usize,
}

/// Download filename offered for an upload: `processed_{stem}.{ext}`.
pub fn download_filename(original: &str, format: OutputFormat) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    format!("processed_{stem}.{}", format.extension())
}

/// Run one conversion, writing the container to `final_path` and the
/// preview PNG to `preview_path`. Returns the page dimensions in
/// pixels at the rasterized resolution.
pub fn convert(
    config: &AppConfig,
    pdf: &Path,
    request: &ConversionRequest,
    final_path: &Path,
    preview_path: &Path,
) -> Result<(usize, usize), ProcessError> {
    let intermediate = tempfile::Builder::new()
        .prefix("riptone-raster-")
        .suffix(".png")
        .tempfile()?;

    Rasterizer::from_config(config).rasterize(pdf, intermediate.path(), request.dpi)?;
    let buffer = decode_gray_png(intermediate.path())?;
    let (width, height) = (buffer.width(), buffer.height());

    let mut screener = Screener::new(request.bit_depth)?.noise_intensity(request.noise);
    if let Some(seed) = request.seed {
        screener = screener.seed(seed);
    }
    let page = screener.process(buffer)?;

    let dpi = request.dpi.axes();
    let container = match request.format {
        OutputFormat::Tiff => write_tiff(&page.raster, dpi),
        OutputFormat::Bmp => write_bmp(&page.raster, dpi),
    };
    std::fs::write(final_path, &container)?;
    write_preview_png(preview_path, &page.preview)?;

    tracing::info!(
        width,
        height,
        bit_depth = request.bit_depth,
        format = request.format.extension(),
        container_bytes = container.len(),
        "Conversion finished"
    );
    Ok((width, height))
}

/// Run one conversion into persisted temp files. The files outlive the
/// call so the job registry can serve them later.
pub fn convert_to_temp(
    config: &AppConfig,
    pdf: &Path,
    request: &ConversionRequest,
) -> Result<ConversionArtifacts, ProcessError> {
    let final_path = persisted_temp_path("riptone-out-", request.format.extension())?;
    let preview_path = persisted_temp_path("riptone-preview-", "png")?;

    let (width, height) = convert(config, pdf, request, &final_path, &preview_path)?;

    Ok(ConversionArtifacts {
        final_path,
        preview_path,
        width,
        height,
    })
}

fn persisted_temp_path(prefix: &str, extension: &str) -> Result<PathBuf, ProcessError> {
    tempfile::Builder::new()
        .prefix(prefix)
        .suffix(&format!(".{extension}"))
        .tempfile()?
        .into_temp_path()
        .keep()
        .map_err(|e| ProcessError::Io(e.error))
}

/// Decode the 8-bit grayscale PNG Ghostscript's `pnggray` device emits.
fn decode_gray_png(path: &Path) -> Result<PixelBuffer, ProcessError> {
    let decoder = png::Decoder::new(File::open(path)?);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ProcessError::Decode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ProcessError::Decode(e.to_string()))?;

    if info.color_type != png::ColorType::Grayscale || info.bit_depth != png::BitDepth::Eight {
        return Err(ProcessError::Decode(format!(
            "expected 8-bit grayscale, got {:?} at {:?}",
            info.color_type, info.bit_depth
        )));
    }

    buf.truncate(info.buffer_size());
    Ok(PixelBuffer::from_gray(
        &buf,
        info.width as usize,
        info.height as usize,
    ))
}

fn write_preview_png(path: &Path, preview: &PreviewImage) -> Result<(), ProcessError> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        preview.width() as u32,
        preview.height() as u32,
    );
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| ProcessError::PngEncode(e.to_string()))?;
    writer
        .write_image_data(preview.rgb())
        .map_err(|e| ProcessError::PngEncode(e.to_string()))?;
    Ok(())
}
