//! Mock extractor for testing.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::extractor::{DownloadOutcome, Extractor, ExtractorError, StreamProbe};

/// Planned probe behavior for one URL.
#[derive(Debug, Clone)]
enum ProbePlan {
    Live,
    Offline,
    Fail(String),
}

/// Planned download behavior for one URL.
#[derive(Debug, Clone)]
struct DownloadPlan {
    declared: PathBuf,
    /// File actually written to disk; `None` writes the declared path.
    actual: Option<PathBuf>,
    fail: Option<String>,
}

/// Mock implementation of the Extractor trait.
///
/// Probe and download behavior is planned per URL; unplanned URLs probe
/// as not live. Downloads write a small artifact file to disk so the
/// filename resolution and cleanup paths run against a real filesystem.
/// Both operations are logged for call-order assertions.
#[derive(Debug, Default)]
pub struct MockExtractor {
    probes: RwLock<HashMap<String, ProbePlan>>,
    downloads: RwLock<HashMap<String, DownloadPlan>>,
    probe_log: RwLock<Vec<String>>,
    download_log: RwLock<Vec<String>>,
}

impl MockExtractor {
    /// Create a new mock extractor with no planned behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan a probe of `url` to report a live stream.
    pub async fn set_live(&self, url: &str) {
        self.probes
            .write()
            .await
            .insert(url.to_string(), ProbePlan::Live);
    }

    /// Plan a probe of `url` to report an offline source.
    pub async fn set_offline(&self, url: &str) {
        self.probes
            .write()
            .await
            .insert(url.to_string(), ProbePlan::Offline);
    }

    /// Plan a probe of `url` to fail with the given message.
    pub async fn set_probe_error(&self, url: &str, message: &str) {
        self.probes
            .write()
            .await
            .insert(url.to_string(), ProbePlan::Fail(message.to_string()));
    }

    /// Plan a download of `url` that lands exactly at `declared`.
    pub async fn set_download(&self, url: &str, declared: impl Into<PathBuf>) {
        self.downloads.write().await.insert(
            url.to_string(),
            DownloadPlan {
                declared: declared.into(),
                actual: None,
                fail: None,
            },
        );
    }

    /// Plan a download of `url` that declares `declared` but writes
    /// `actual` instead, as happens when the stream is remuxed.
    pub async fn set_download_renamed(
        &self,
        url: &str,
        declared: impl Into<PathBuf>,
        actual: impl Into<PathBuf>,
    ) {
        self.downloads.write().await.insert(
            url.to_string(),
            DownloadPlan {
                declared: declared.into(),
                actual: Some(actual.into()),
                fail: None,
            },
        );
    }

    /// Plan a download of `url` to fail with the given message.
    pub async fn set_download_error(&self, url: &str, message: &str) {
        self.downloads.write().await.insert(
            url.to_string(),
            DownloadPlan {
                declared: PathBuf::new(),
                actual: None,
                fail: Some(message.to_string()),
            },
        );
    }

    /// URLs probed, in call order.
    pub async fn probed_urls(&self) -> Vec<String> {
        self.probe_log.read().await.clone()
    }

    /// URLs downloaded, in call order.
    pub async fn downloaded_urls(&self) -> Vec<String> {
        self.download_log.read().await.clone()
    }

    async fn write_artifact(path: &Path) -> Result<(), ExtractorError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExtractorError::LaunchFailed(e.to_string()))?;
        }
        tokio::fs::write(path, b"mock capture data")
            .await
            .map_err(|e| ExtractorError::ExtractionFailed(e.to_string()))
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, url: &str) -> Result<StreamProbe, ExtractorError> {
        self.probe_log.write().await.push(url.to_string());

        let plan = self
            .probes
            .read()
            .await
            .get(url)
            .cloned()
            .unwrap_or(ProbePlan::Offline);

        match plan {
            ProbePlan::Live => Ok(StreamProbe {
                is_live: true,
                raw: json!({"is_live": true}),
            }),
            ProbePlan::Offline => Ok(StreamProbe {
                is_live: false,
                raw: json!({"is_live": false}),
            }),
            ProbePlan::Fail(message) => Err(ExtractorError::ExtractionFailed(message)),
        }
    }

    async fn download(&self, url: &str) -> Result<DownloadOutcome, ExtractorError> {
        self.download_log.write().await.push(url.to_string());

        let plan = self.downloads.read().await.get(url).cloned();
        let Some(plan) = plan else {
            return Err(ExtractorError::ExtractionFailed(format!(
                "no download planned for {}",
                url
            )));
        };

        if let Some(message) = plan.fail {
            return Err(ExtractorError::ExtractionFailed(message));
        }

        let target = plan.actual.as_ref().unwrap_or(&plan.declared);
        Self::write_artifact(target).await?;

        Ok(DownloadOutcome {
            declared_path: plan.declared,
            raw: json!({}),
        })
    }
}
