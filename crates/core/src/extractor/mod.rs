//! Video extraction abstraction.
//!
//! This module provides an `Extractor` trait with two operations: a
//! liveness probe that never downloads, and a download that captures the
//! stream and reports the output path it intended to write.

mod types;
mod ytdlp;

pub use types::*;
pub use ytdlp::YtDlpExtractor;
