use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archivist_core::{
    load_config, validate_config, CaptureOrchestrator, CaptureOutcome, Extractor, LedgerGateway,
    ObjectStore, S3ObjectStore, SheetsLedger, YtDlpExtractor,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ARCHIVIST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Ledger spreadsheet: {}", config.ledger.spreadsheet_id);
    info!(
        "Storage bucket: {} ({})",
        config.storage.bucket, config.storage.region
    );

    // Create collaborators
    let ledger: Arc<dyn LedgerGateway> = Arc::new(
        SheetsLedger::new(config.ledger.clone()).context("Failed to create ledger gateway")?,
    );
    let extractor: Arc<dyn Extractor> =
        Arc::new(YtDlpExtractor::new(config.extractor.clone()));
    let store: Arc<dyn ObjectStore> =
        Arc::new(S3ObjectStore::connect(config.storage.clone()).await);

    // One scan per invocation
    let orchestrator = CaptureOrchestrator::new(
        config.capture.clone(),
        config.ledger.columns.clone(),
        ledger,
        extractor,
        store,
    );

    info!("Starting capture scan");
    let summary = orchestrator.run().await.context("Capture run failed")?;

    match &summary.capture {
        Some(report) => match &report.outcome {
            CaptureOutcome::Archived { url } => info!(
                worksheet = report.worksheet,
                row = report.row,
                url = %url,
                "Capture archived"
            ),
            CaptureOutcome::Failed { message } => info!(
                worksheet = report.worksheet,
                row = report.row,
                error = %message,
                "Capture attempted but failed"
            ),
        },
        None => info!("No live source found"),
    }

    info!(
        summary = %serde_json::to_string(&summary).unwrap_or_default(),
        "Scan complete"
    );

    Ok(())
}
