pub mod capture;
pub mod config;
pub mod extractor;
pub mod ledger;
pub mod storage;
pub mod testing;

pub use capture::{
    CaptureConfig, CaptureOrchestrator, CaptureOutcome, CaptureReport, OrchestratorError,
    RunSummary,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use extractor::{Extractor, ExtractorError, YtDlpExtractor};
pub use ledger::{ColumnMap, LedgerError, LedgerGateway, SheetsLedger};
pub use storage::{ObjectStore, S3ObjectStore, StorageError, UploadOptions};
