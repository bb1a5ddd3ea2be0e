//! Capture lifecycle integration tests.
//!
//! These tests drive full orchestrator runs against the mock
//! collaborators and verify the scan-and-capture contract: eligibility,
//! the single-capture invariant, halt-after-claim, and the write-back
//! shapes for success, probe failure, and upload failure.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use archivist_core::capture::{CaptureConfig, CaptureOrchestrator, CaptureOutcome};
use archivist_core::ledger::{ColumnMap, LedgerError};
use archivist_core::storage::StorageError;
use archivist_core::testing::{fixtures, MockExtractor, MockLedger, MockObjectStore};
use archivist_core::{Extractor, LedgerGateway, ObjectStore};

/// Test helper bundling the mock collaborators.
struct TestHarness {
    ledger: Arc<MockLedger>,
    extractor: Arc<MockExtractor>,
    store: Arc<MockObjectStore>,
    temp: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            ledger: Arc::new(MockLedger::new()),
            extractor: Arc::new(MockExtractor::new()),
            store: Arc::new(MockObjectStore::new()),
            temp: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn orchestrator(&self, worksheets: usize) -> CaptureOrchestrator {
        CaptureOrchestrator::new(
            CaptureConfig {
                worksheets,
                first_data_row: 2,
            },
            ColumnMap::default(),
            Arc::clone(&self.ledger) as Arc<dyn LedgerGateway>,
            Arc::clone(&self.extractor) as Arc<dyn Extractor>,
            Arc::clone(&self.store) as Arc<dyn ObjectStore>,
        )
    }

    fn artifact_path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }
}

#[tokio::test]
async fn test_no_live_sources_leaves_ledger_untouched() {
    let harness = TestHarness::new();
    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/a", ""),
                fixtures::job_row("https://example.com/b", ""),
            ],
        )
        .await;
    harness.extractor.set_offline("https://example.com/a").await;
    harness.extractor.set_offline("https://example.com/b").await;

    let orchestrator = harness.orchestrator(1);
    let summary = orchestrator.run().await.unwrap();

    assert!(!orchestrator.capture_claimed());
    assert!(summary.capture.is_none());
    assert_eq!(summary.rows_probed, 2);
    assert!(harness.ledger.writes().await.is_empty());
    assert!(harness.store.uploads().await.is_empty());
}

#[tokio::test]
async fn test_ineligible_rows_are_never_probed() {
    let harness = TestHarness::new();
    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                // Row 1 would be eligible by cell content, but sits above
                // the first data row.
                fixtures::job_row("https://example.com/header", ""),
                fixtures::job_row("", ""),
                fixtures::job_row("https://example.com/done", "successful"),
                fixtures::job_row("https://example.com/pending", ""),
            ],
        )
        .await;
    harness
        .extractor
        .set_offline("https://example.com/pending")
        .await;

    let orchestrator = harness.orchestrator(1);
    let summary = orchestrator.run().await.unwrap();

    assert_eq!(
        harness.extractor.probed_urls().await,
        vec!["https://example.com/pending"]
    );
    assert_eq!(summary.rows_probed, 1);
}

#[tokio::test]
async fn test_successful_capture_writes_back_row() {
    let harness = TestHarness::new();
    let artifact = harness.artifact_path("stream42.mp4");

    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/live", ""),
            ],
        )
        .await;
    harness.extractor.set_live("https://example.com/live").await;
    harness
        .extractor
        .set_download("https://example.com/live", &artifact)
        .await;

    let orchestrator = harness.orchestrator(1);
    let summary = orchestrator.run().await.unwrap();

    // Final row state: status, ISO-8601 timestamp, archived URL.
    assert_eq!(harness.ledger.cell(0, "K2").await, "successful");
    let timestamp = harness.ledger.cell(0, "L2").await;
    assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
    assert_eq!(
        harness.ledger.cell(0, "M2").await,
        "https://mock-bucket.mock-region.cdn.example.com/stream42.mp4"
    );

    // Provisional marker first, then one batched final write.
    let writes = harness.ledger.writes().await;
    assert_eq!(writes.len(), 2);
    assert!(!writes[0].batched);
    assert_eq!(writes[0].updates[0].value, "Recording stream");
    assert!(writes[1].batched);
    assert_eq!(writes[1].updates.len(), 3);

    // Key derived from the artifact's base name; local file removed.
    let uploads = harness.store.uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].key, "stream42.mp4");
    assert!(!artifact.exists());

    match summary.capture.unwrap().outcome {
        CaptureOutcome::Archived { url } => {
            assert!(url.ends_with("/stream42.mp4"));
        }
        CaptureOutcome::Failed { message } => panic!("expected archive, got: {}", message),
    }
}

#[tokio::test]
async fn test_at_most_one_capture_per_run() {
    let harness = TestHarness::new();
    let artifact = harness.artifact_path("first.mp4");

    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/offline", ""),
                fixtures::job_row("https://example.com/live-a", ""),
                fixtures::job_row("https://example.com/live-b", ""),
            ],
        )
        .await;
    harness
        .ledger
        .set_worksheet(
            1,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/live-c", ""),
            ],
        )
        .await;

    harness
        .extractor
        .set_offline("https://example.com/offline")
        .await;
    for url in [
        "https://example.com/live-a",
        "https://example.com/live-b",
        "https://example.com/live-c",
    ] {
        harness.extractor.set_live(url).await;
    }
    harness
        .extractor
        .set_download("https://example.com/live-a", &artifact)
        .await;

    let orchestrator = harness.orchestrator(2);
    let summary = orchestrator.run().await.unwrap();

    // Scanning stopped at the first live hit: live-b and live-c were
    // never probed, nothing was downloaded besides live-a.
    assert!(orchestrator.capture_claimed());
    assert_eq!(
        harness.extractor.probed_urls().await,
        vec!["https://example.com/offline", "https://example.com/live-a"]
    );
    assert_eq!(
        harness.extractor.downloaded_urls().await,
        vec!["https://example.com/live-a"]
    );
    assert_eq!(harness.store.uploads().await.len(), 1);
    assert_eq!(summary.worksheets_scanned, 1);

    let report = summary.capture.unwrap();
    assert_eq!(report.worksheet, 0);
    assert_eq!(report.row, 3);
}

#[tokio::test]
async fn test_probe_failure_is_recorded_and_scan_continues() {
    let harness = TestHarness::new();
    let artifact = harness.artifact_path("after-failure.mp4");

    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/broken", ""),
                fixtures::job_row("https://example.com/live", ""),
            ],
        )
        .await;
    harness
        .extractor
        .set_probe_error("https://example.com/broken", "boom")
        .await;
    harness.extractor.set_live("https://example.com/live").await;
    harness
        .extractor
        .set_download("https://example.com/live", &artifact)
        .await;

    let orchestrator = harness.orchestrator(1);
    let summary = orchestrator.run().await.unwrap();

    // The broken row got the error text and a timestamp, no URL.
    assert_eq!(
        harness.ledger.cell(0, "K2").await,
        "Extraction failed: boom"
    );
    assert!(chrono::DateTime::parse_from_rfc3339(&harness.ledger.cell(0, "L2").await).is_ok());
    assert_eq!(harness.ledger.cell(0, "M2").await, "");

    // The scan moved on and captured the next row.
    assert_eq!(summary.probe_failures, 1);
    assert_eq!(harness.ledger.cell(0, "K3").await, "successful");
}

#[tokio::test]
async fn test_fallback_container_is_uploaded() {
    let harness = TestHarness::new();
    let declared = harness.artifact_path("stream42.mp4");
    let actual = harness.artifact_path("stream42.mkv");

    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/live", ""),
            ],
        )
        .await;
    harness.extractor.set_live("https://example.com/live").await;
    harness
        .extractor
        .set_download_renamed("https://example.com/live", &declared, &actual)
        .await;

    let orchestrator = harness.orchestrator(1);
    orchestrator.run().await.unwrap();

    let uploads = harness.store.uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].key, "stream42.mkv");
    assert_eq!(uploads[0].source, actual);
    assert_eq!(harness.ledger.cell(0, "K2").await, "successful");
    assert!(!actual.exists());
}

#[tokio::test]
async fn test_wrong_fallback_surfaces_as_failure() {
    let harness = TestHarness::new();
    let declared = harness.artifact_path("stream42.mp4");
    // The artifact lands somewhere the one-shot fallback cannot find.
    let actual = harness.artifact_path("other.webm");

    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/live", ""),
            ],
        )
        .await;
    harness.extractor.set_live("https://example.com/live").await;
    harness
        .extractor
        .set_download_renamed("https://example.com/live", &declared, &actual)
        .await;

    let orchestrator = harness.orchestrator(1);
    let summary = orchestrator.run().await.unwrap();

    assert!(harness.store.uploads().await.is_empty());
    let status = harness.ledger.cell(0, "K2").await;
    assert!(status.contains("Failed to read"), "status: {}", status);
    assert!(matches!(
        summary.capture.unwrap().outcome,
        CaptureOutcome::Failed { .. }
    ));
}

#[tokio::test]
async fn test_upload_failure_cleans_up_and_halts() {
    let harness = TestHarness::new();
    let artifact = harness.artifact_path("stream42.mp4");

    harness
        .ledger
        .set_worksheet(
            0,
            vec![
                fixtures::header_row(),
                fixtures::job_row("https://example.com/live", ""),
                fixtures::job_row("https://example.com/also-live", ""),
            ],
        )
        .await;
    harness.extractor.set_live("https://example.com/live").await;
    harness
        .extractor
        .set_live("https://example.com/also-live")
        .await;
    harness
        .extractor
        .set_download("https://example.com/live", &artifact)
        .await;
    harness
        .store
        .set_next_error(StorageError::UploadFailed {
            key: "stream42.mp4".to_string(),
            message: "access denied".to_string(),
        })
        .await;

    let orchestrator = harness.orchestrator(1);
    let summary = orchestrator.run().await.unwrap();

    // The local file is gone even though the upload failed.
    assert!(!artifact.exists());

    // The failure text landed in the status cell, no URL was written.
    let status = harness.ledger.cell(0, "K2").await;
    assert!(status.contains("access denied"), "status: {}", status);
    assert_eq!(harness.ledger.cell(0, "M2").await, "");

    // The run halted: the second live row was never probed.
    assert!(orchestrator.capture_claimed());
    assert_eq!(
        harness.extractor.probed_urls().await,
        vec!["https://example.com/live"]
    );
    assert!(matches!(
        summary.capture.unwrap().outcome,
        CaptureOutcome::Failed { .. }
    ));
}

#[tokio::test]
async fn test_ledger_read_failure_aborts_run() {
    let harness = TestHarness::new();
    harness.ledger.set_worksheet(0, vec![]).await;
    harness.ledger.set_next_error(LedgerError::Timeout).await;

    let orchestrator = harness.orchestrator(1);
    assert!(orchestrator.run().await.is_err());
}

#[tokio::test]
async fn test_missing_worksheet_aborts_run() {
    let harness = TestHarness::new();
    harness
        .ledger
        .set_worksheet(0, vec![fixtures::header_row()])
        .await;

    // Configured to scan two worksheets, only one exists.
    let orchestrator = harness.orchestrator(2);
    assert!(orchestrator.run().await.is_err());
}
