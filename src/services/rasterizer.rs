//! Ghostscript-backed PDF rasterization.
//!
//! The first page of the uploaded PDF is rendered to an 8-bit
//! grayscale PNG at the requested resolution. Ghostscript does the
//! heavy lifting as a subprocess; this module only builds the argument
//! list and classifies failures.

use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use crate::error::RasterizeError;
use crate::models::AppConfig;

/// Resolution request. Print heads with different horizontal and
/// vertical addressability need distinct per-axis values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpi {
    Symmetric(u32),
    Asymmetric(u32, u32),
}

impl Dpi {
    /// The `(x, y)` pair, with symmetric values duplicated.
    pub fn axes(&self) -> (u32, u32) {
        match *self {
            Dpi::Symmetric(d) => (d, d),
            Dpi::Asymmetric(x, y) => (x, y),
        }
    }
}

impl FromStr for Dpi {
    type Err = RasterizeError;

    /// Accepts `"300"` or `"1200x600"`. Zero on either axis is
    /// rejected; Ghostscript would accept it and render nothing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RasterizeError::InvalidDpi(s.to_string());

        let dpi = match s.split_once('x') {
            Some((x, y)) => Dpi::Asymmetric(
                x.trim().parse().map_err(|_| invalid())?,
                y.trim().parse().map_err(|_| invalid())?,
            ),
            None => Dpi::Symmetric(s.trim().parse().map_err(|_| invalid())?),
        };

        let (x, y) = dpi.axes();
        if x == 0 || y == 0 {
            return Err(invalid());
        }
        Ok(dpi)
    }
}

/// Wrapper around the Ghostscript executable.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    ghostscript: String,
    rendering_threads: u32,
    memory_mb: u32,
}

impl Rasterizer {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ghostscript: config.ghostscript.clone(),
            rendering_threads: config.rendering_threads,
            memory_mb: config.memory_mb,
        }
    }

    /// Render page 1 of `pdf` to a grayscale PNG at `output`.
    pub fn rasterize(&self, pdf: &Path, output: &Path, dpi: Dpi) -> Result<(), RasterizeError> {
        let resolution = match dpi {
            Dpi::Symmetric(d) => format!("-r{d}"),
            Dpi::Asymmetric(x, y) => format!("-r{x}x{y}"),
        };

        let result = Command::new(&self.ghostscript)
            .arg("-dNOPAUSE")
            .arg("-dBATCH")
            .arg("-dSAFER")
            .arg("-sDEVICE=pnggray")
            .arg(&resolution)
            .arg("-dFirstPage=1")
            .arg("-dLastPage=1")
            .arg(format!("-dNumRenderingThreads={}", self.rendering_threads))
            .arg(format!("-dMaxBitmap={}", self.memory_mb as u64 * 1_000_000))
            .arg(format!("-sOutputFile={}", output.display()))
            .arg(pdf)
            .output();

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RasterizeError::GhostscriptNotFound(self.ghostscript.clone()));
            }
            Err(e) => return Err(RasterizeError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RasterizeError::GhostscriptFailed {
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        tracing::debug!(pdf = %pdf.display(), %resolution, "Rasterized PDF page");
        Ok(())
    }
}
