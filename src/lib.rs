//! Riptone: PDF to print-RIP halftone conversion service.
//!
//! Riptone wraps the [`rip_dither`] screening core with everything a
//! deployment needs around it: a Ghostscript rasterization step, an
//! HTTP upload/preview/download API, a one-shot CLI, and TIFF/BMP
//! container writers for the packed raster the core produces.
//!
//! One conversion flows as:
//!
//! ```text
//! PDF upload -> Ghostscript (grayscale PNG at the requested DPI)
//!            -> rip_dither::Screener (noise, diffusion, encode, preview)
//!            -> container writer (TIFF or BMP) + preview PNG
//!            -> job registry (served by /preview/:id and /download/:id)
//! ```

pub mod api;
pub mod container;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
