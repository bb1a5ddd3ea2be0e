use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capture::CaptureConfig;
use crate::ledger::ColumnMap;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Ledger (spreadsheet) service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Base URL of the spreadsheet values API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Identifier of the spreadsheet holding the job worksheets
    pub spreadsheet_id: String,
    /// Bearer token used for API requests
    pub api_token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Mapping of semantic fields to worksheet columns
    #[serde(default)]
    pub columns: ColumnMap,
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket name
    pub bucket: String,
    /// Region name
    pub region: String,
    /// API key
    pub key: String,
    /// API secret
    pub secret: String,
    /// Endpoint URL template, `{region}` is inserted at construction
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// CDN URL template, `{bucket}`, `{region}` and `{key}` are inserted at runtime
    #[serde(default = "default_cdn_url")]
    pub cdn_url: String,
    /// If true, uploaded objects are not publicly readable
    #[serde(default)]
    pub private: bool,
}

fn default_endpoint_url() -> String {
    "https://{region}.example-object-store.com".to_string()
}

fn default_cdn_url() -> String {
    "https://{bucket}.{region}.cdn.example.com/{key}".to_string()
}

/// Extraction client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    /// Path to the extractor binary
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Directory captures are downloaded into
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            work_dir: default_work_dir(),
        }
    }
}

fn default_binary() -> String {
    "yt-dlp".to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("tmp")
}
