//! HTTP request handlers.

pub mod download;
pub mod preview;
pub mod process;

pub use download::handle_download;
pub use preview::handle_preview;
pub use process::{handle_process, ProcessResponse};
