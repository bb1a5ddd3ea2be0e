//! Capture orchestrator implementation.
//!
//! Drives one scan over the ledger:
//! - Worksheets and rows are visited strictly in order.
//! - The first live source claims the run-scoped capture lock; at most
//!   one capture attempt happens per run.
//! - Extraction and upload failures become the row's status text; ledger
//!   failures abort the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::extractor::Extractor;
use crate::ledger::{CellUpdate, ColumnMap, LedgerGateway};
use crate::storage::{ObjectStore, UploadOptions};

use super::config::CaptureConfig;
use super::filename::{resolve_artifact, Resolution};
use super::types::{
    CaptureError, CaptureOutcome, CaptureReport, CaptureSession, OrchestratorError, RunSummary,
};

/// Status written while the capture is in flight, before the download
/// starts, so external observers see the row is being worked on.
const STATUS_RECORDING: &str = "Recording stream";

/// Status written after a successful archive.
const STATUS_SUCCESSFUL: &str = "successful";

/// The capture orchestrator - scans the ledger and captures the first
/// live source it finds.
pub struct CaptureOrchestrator {
    config: CaptureConfig,
    columns: ColumnMap,
    ledger: Arc<dyn LedgerGateway>,
    extractor: Arc<dyn Extractor>,
    store: Arc<dyn ObjectStore>,

    // Run-scoped single-capture invariant; claimed at most once via swap.
    capture_claimed: AtomicBool,
}

impl CaptureOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: CaptureConfig,
        columns: ColumnMap,
        ledger: Arc<dyn LedgerGateway>,
        extractor: Arc<dyn Extractor>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            columns,
            ledger,
            extractor,
            store,
            capture_claimed: AtomicBool::new(false),
        }
    }

    /// Whether this run's capture lock has been claimed.
    pub fn capture_claimed(&self) -> bool {
        self.capture_claimed.load(Ordering::SeqCst)
    }

    /// Execute one scan over all configured worksheets.
    pub async fn run(&self) -> Result<RunSummary, OrchestratorError> {
        let mut summary = RunSummary::default();

        'worksheets: for worksheet in 0..self.config.worksheets {
            if self.capture_claimed() {
                break;
            }

            let rows = self.ledger.read_all(worksheet).await?;
            summary.worksheets_scanned += 1;
            debug!(worksheet, rows = rows.len(), "Scanning worksheet");

            for (idx, values) in rows.iter().enumerate() {
                let row = idx + 1;
                if row < self.config.first_data_row {
                    continue;
                }
                if self.capture_claimed() {
                    break 'worksheets;
                }

                let Some(source_url) = self.eligible_source(values) else {
                    continue;
                };

                summary.rows_probed += 1;
                debug!(worksheet, row, url = source_url, "Probing source");

                let probe = match self.extractor.probe(source_url).await {
                    Ok(probe) => probe,
                    Err(e) => {
                        summary.probe_failures += 1;
                        warn!(worksheet, row, url = source_url, error = %e, "Probe failed");
                        self.record_failure(worksheet, row, &e.to_string()).await?;
                        continue;
                    }
                };

                if !probe.is_live {
                    continue;
                }

                // Claim-once: if another path of this run already claimed
                // the lock, the scan is over.
                if self.capture_claimed.swap(true, Ordering::SeqCst) {
                    break 'worksheets;
                }

                let session = CaptureSession::new(worksheet, row, source_url);
                info!(
                    session = %session.id,
                    worksheet,
                    row,
                    url = source_url,
                    "Live source detected, starting capture"
                );

                self.ledger
                    .update_cell(worksheet, &self.columns.status_range(row), STATUS_RECORDING)
                    .await?;

                let outcome = match self.attempt_capture(&session).await {
                    Ok(url) => {
                        info!(session = %session.id, url = %url, "Capture archived");
                        self.record_success(worksheet, row, &url).await?;
                        CaptureOutcome::Archived { url }
                    }
                    Err(e) => {
                        let message = e.to_string();
                        warn!(session = %session.id, error = %message, "Capture failed");
                        self.record_failure(worksheet, row, &message).await?;
                        CaptureOutcome::Failed { message }
                    }
                };

                summary.capture = Some(CaptureReport {
                    worksheet,
                    row,
                    source_url: session.source_url,
                    outcome,
                });
                break 'worksheets;
            }
        }

        Ok(summary)
    }

    fn eligible_source<'a>(&self, values: &'a [String]) -> Option<&'a str> {
        eligible_source(&self.columns, values)
    }

    /// Download, resolve the artifact, upload, clean up.
    ///
    /// The download call re-extracts instead of reusing the probe
    /// metadata: a live stream's renditions can change between the two
    /// calls. The local file is removed whether or not the upload
    /// succeeded.
    async fn attempt_capture(&self, session: &CaptureSession) -> Result<String, CaptureError> {
        let download = self.extractor.download(&session.source_url).await?;

        let artifact = resolve_artifact(&download.declared_path);
        if artifact.resolution == Resolution::FallbackContainer {
            info!(
                session = %session.id,
                declared = %download.declared_path.display(),
                resolved = %artifact.path.display(),
                "Declared path absent, substituted fallback container"
            );
        }

        let key = artifact
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CaptureError::KeyDerivation(artifact.path.clone()))?;

        let uploaded = self
            .store
            .upload(&artifact.path, &key, UploadOptions::default())
            .await;

        // Session-scoped cleanup, runs regardless of upload outcome.
        if let Err(e) = tokio::fs::remove_file(&artifact.path).await {
            warn!(
                session = %session.id,
                path = %artifact.path.display(),
                error = %e,
                "Failed to remove local capture file"
            );
        }

        uploaded?;
        Ok(self.store.cdn_url(&key))
    }

    async fn record_success(
        &self,
        worksheet: usize,
        row: usize,
        archived_url: &str,
    ) -> Result<(), OrchestratorError> {
        self.ledger
            .batch_update(
                worksheet,
                vec![
                    CellUpdate::new(self.columns.status_range(row), STATUS_SUCCESSFUL),
                    CellUpdate::new(self.columns.timestamp_range(row), Utc::now().to_rfc3339()),
                    CellUpdate::new(self.columns.archived_url_range(row), archived_url),
                ],
            )
            .await?;
        Ok(())
    }

    async fn record_failure(
        &self,
        worksheet: usize,
        row: usize,
        message: &str,
    ) -> Result<(), OrchestratorError> {
        self.ledger
            .batch_update(
                worksheet,
                vec![
                    CellUpdate::new(self.columns.status_range(row), message),
                    CellUpdate::new(self.columns.timestamp_range(row), Utc::now().to_rfc3339()),
                ],
            )
            .await?;
        Ok(())
    }
}

/// Returns the row's source URL when the row is eligible: a non-empty
/// URL cell and an empty status cell.
fn eligible_source<'a>(columns: &ColumnMap, values: &'a [String]) -> Option<&'a str> {
    let url = values.get(columns.source_url)?;
    if url.is_empty() {
        return None;
    }
    let status = values
        .get(columns.status_index())
        .map(String::as_str)
        .unwrap_or("");
    status.is_empty().then_some(url.as_str())
}
