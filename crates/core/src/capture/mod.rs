//! Capture orchestration.
//!
//! The orchestrator scans the ledger worksheets in order, probes eligible
//! rows for liveness, and on the first live hit captures the stream,
//! archives it, and writes the outcome back to the row. A run performs at
//! most one capture attempt; once the run-scoped lock is claimed no
//! further row is examined.

mod config;
mod filename;
mod runner;
mod types;

pub use config::CaptureConfig;
pub use filename::{resolve_artifact, resolve_with, ResolvedArtifact, Resolution, FALLBACK_CONTAINER_EXT};
pub use runner::CaptureOrchestrator;
pub use types::{
    CaptureError, CaptureOutcome, CaptureReport, CaptureSession, OrchestratorError, RunSummary,
};
