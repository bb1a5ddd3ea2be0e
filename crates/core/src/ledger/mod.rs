//! Job ledger abstraction.
//!
//! This module provides a `LedgerGateway` trait for reading worksheet
//! snapshots and writing cell updates back, plus a REST implementation
//! against a Google-Sheets-shaped values API.

mod sheets;
mod types;

pub use sheets::SheetsLedger;
pub use types::*;
