//! yt-dlp based extractor implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::config::ExtractorConfig;

use super::types::{DownloadOutcome, Extractor, ExtractorError, StreamProbe};

/// Output filename template, relative to the work directory.
const OUTPUT_TEMPLATE: &str = "%(id)s.%(ext)s";

/// Extractor backed by the yt-dlp binary.
///
/// Both operations run the binary with `--dump-single-json` and parse the
/// info JSON it prints; the download variant additionally writes the
/// capture into the configured work directory.
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Creates an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    fn output_template(&self) -> String {
        self.config
            .work_dir
            .join(OUTPUT_TEMPLATE)
            .to_string_lossy()
            .into_owned()
    }

    async fn run(&self, args: &[&str]) -> Result<Value, ExtractorError> {
        debug!(binary = %self.config.binary, ?args, "Running extractor");

        let output = Command::new(&self.config.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ExtractorError::LaunchFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let excerpt: String = stderr.chars().take(500).collect();
            return Err(ExtractorError::ExtractionFailed(format!(
                "{} exited with {}: {}",
                self.config.binary,
                output.status,
                excerpt.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| ExtractorError::InvalidMetadata(e.to_string()))
    }

    /// Derives the declared output path from the info JSON.
    ///
    /// Playlist results carry the downloaded item under `entries`; the
    /// first entry names the file.
    fn declared_path(&self, info: &Value) -> Result<PathBuf, ExtractorError> {
        let item = match info.get("entries").and_then(Value::as_array) {
            Some(entries) => entries
                .first()
                .ok_or_else(|| ExtractorError::InvalidMetadata("empty entries list".to_string()))?,
            None => info,
        };

        let id = item
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ExtractorError::InvalidMetadata("missing id".to_string()))?;
        let ext = item
            .get("ext")
            .and_then(Value::as_str)
            .ok_or_else(|| ExtractorError::InvalidMetadata("missing ext".to_string()))?;

        Ok(self.config.work_dir.join(format!("{}.{}", id, ext)))
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<StreamProbe, ExtractorError> {
        let raw = self
            .run(&["--dump-single-json", "--simulate", url])
            .await?;

        let is_live = raw.get("is_live").and_then(Value::as_bool).unwrap_or(false);
        debug!(url, is_live, "Probed source");

        Ok(StreamProbe { is_live, raw })
    }

    async fn download(&self, url: &str) -> Result<DownloadOutcome, ExtractorError> {
        tokio::fs::create_dir_all(&self.config.work_dir)
            .await
            .map_err(|e| ExtractorError::LaunchFailed(format!("work dir: {}", e)))?;

        let template = self.output_template();
        let raw = self
            .run(&["--dump-single-json", "--no-simulate", "-o", &template, url])
            .await?;

        let declared_path = self.declared_path(&raw)?;
        debug!(url, declared = %declared_path.display(), "Download finished");

        Ok(DownloadOutcome { declared_path, raw })
    }
}
