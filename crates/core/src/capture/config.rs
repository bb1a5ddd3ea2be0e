//! Capture orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the capture orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Number of worksheets scanned per run, in index order.
    #[serde(default = "default_worksheets")]
    pub worksheets: usize,

    /// First 1-based worksheet row holding job data.
    /// Rows above it are headers and never examined.
    #[serde(default = "default_first_data_row")]
    pub first_data_row: usize,
}

fn default_worksheets() -> usize {
    5
}

fn default_first_data_row() -> usize {
    2
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            worksheets: default_worksheets(),
            first_data_row: default_first_data_row(),
        }
    }
}
