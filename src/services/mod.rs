pub mod jobs;
pub mod processor;
pub mod rasterizer;

pub use jobs::{Job, JobStore};
pub use processor::{convert_to_temp, ConversionArtifacts, ConversionRequest, OutputFormat};
pub use rasterizer::{Dpi, Rasterizer};
