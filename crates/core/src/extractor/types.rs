//! Types for extraction operations.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Failed to launch extractor: {0}")]
    LaunchFailed(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Invalid stream metadata: {0}")]
    InvalidMetadata(String),
}

/// Result of a liveness probe.
#[derive(Debug, Clone)]
pub struct StreamProbe {
    /// Whether the source is currently live-streaming.
    pub is_live: bool,
    /// The extractor's raw metadata, kept opaque to callers.
    pub raw: serde_json::Value,
}

/// Result of a download.
///
/// The download happens as a side effect; `declared_path` is where the
/// extractor intended to write the capture and may not match the file
/// that actually landed on disk.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub declared_path: PathBuf,
    pub raw: serde_json::Value,
}

/// Trait for extraction backends.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Query stream metadata without downloading anything.
    async fn probe(&self, url: &str) -> Result<StreamProbe, ExtractorError>;

    /// Download the stream and return the declared output path.
    async fn download(&self, url: &str) -> Result<DownloadOutcome, ExtractorError>;
}
