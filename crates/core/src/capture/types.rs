//! Types for the capture orchestrator.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Errors that abort a whole run.
///
/// Only ledger communication is fatal: without write-back the run has no
/// way to record outcomes. Everything else is folded into the row's
/// status text.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] crate::ledger::LedgerError),
}

/// Errors that fail a single capture attempt.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] crate::extractor::ExtractorError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    /// The resolved artifact path has no file name to derive a key from.
    #[error("artifact path has no file name: {}", .0.display())]
    KeyDerivation(PathBuf),
}

/// One live-stream capture attempt, scoped to a single ledger row.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    /// Correlation id for logs.
    pub id: Uuid,
    /// Worksheet index the row lives in.
    pub worksheet: usize,
    /// 1-based row index.
    pub row: usize,
    /// Source URL being captured.
    pub source_url: String,
}

impl CaptureSession {
    pub fn new(worksheet: usize, row: usize, source_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            worksheet,
            row,
            source_url: source_url.into(),
        }
    }
}

/// Outcome of the single capture attempt of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum CaptureOutcome {
    /// The capture was uploaded; the archived URL was written back.
    Archived { url: String },
    /// The attempt failed; the message was written into the status cell.
    Failed { message: String },
}

/// The capture attempted during a run, if any.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureReport {
    pub worksheet: usize,
    pub row: usize,
    pub source_url: String,
    #[serde(flatten)]
    pub outcome: CaptureOutcome,
}

/// Summary of one orchestrator run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Worksheets whose snapshot was read.
    pub worksheets_scanned: usize,
    /// Eligible rows probed for liveness.
    pub rows_probed: usize,
    /// Probes that failed and were recorded to their row.
    pub probe_failures: usize,
    /// The run's capture attempt, absent when nothing was live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureReport>,
}
