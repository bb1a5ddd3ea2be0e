//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the three collaborator
//! traits, allowing full orchestrator runs without a spreadsheet, an
//! extractor binary, or an object store.
//!
//! # Example
//!
//! ```rust,ignore
//! use archivist_core::testing::{MockExtractor, MockLedger, MockObjectStore};
//!
//! let ledger = MockLedger::new();
//! let extractor = MockExtractor::new();
//! let store = MockObjectStore::new();
//!
//! ledger.set_worksheet(0, vec![fixtures::job_row("https://example.com/live", "")]).await;
//! extractor.set_live("https://example.com/live").await;
//! ```

mod mock_extractor;
mod mock_ledger;
mod mock_store;

pub use mock_extractor::MockExtractor;
pub use mock_ledger::{MockLedger, RecordedWrite};
pub use mock_store::{MockObjectStore, RecordedUpload};

/// Test fixtures and helper functions.
pub mod fixtures {
    /// Builds a worksheet row in the default column layout: the source
    /// URL in column B, the status in column K.
    pub fn job_row(source_url: &str, status: &str) -> Vec<String> {
        let mut values = vec![String::new(); 13];
        values[1] = source_url.to_string();
        values[10] = status.to_string();
        values
    }

    /// A header row, never eligible.
    pub fn header_row() -> Vec<String> {
        let mut values = vec![String::new(); 13];
        values[1] = "Source".to_string();
        values[10] = "Status".to_string();
        values
    }
}
