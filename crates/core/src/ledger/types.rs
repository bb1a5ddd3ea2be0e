//! Types for ledger operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Worksheet not found: index {0}")]
    WorksheetNotFound(usize),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,
}

/// A single cell write, addressed by a row-relative A1 range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    /// A1 range within the worksheet, e.g. "K5".
    pub range: String,
    /// Value written into the cell.
    pub value: String,
}

impl CellUpdate {
    pub fn new(range: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            value: value.into(),
        }
    }
}

/// Maps the semantic job-row fields onto worksheet columns.
///
/// Row values come back from the ledger as a plain `Vec<String>`; the
/// source URL is picked by value index while the writable cells are
/// addressed by column letter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnMap {
    /// 0-based index of the source URL within a row's values.
    #[serde(default = "default_source_url_index")]
    pub source_url: usize,
    /// Column letter of the status cell.
    #[serde(default = "default_status_column")]
    pub status: String,
    /// Column letter of the timestamp cell.
    #[serde(default = "default_timestamp_column")]
    pub timestamp: String,
    /// Column letter of the archived-URL cell.
    #[serde(default = "default_archived_url_column")]
    pub archived_url: String,
}

fn default_source_url_index() -> usize {
    1
}

fn default_status_column() -> String {
    "K".to_string()
}

fn default_timestamp_column() -> String {
    "L".to_string()
}

fn default_archived_url_column() -> String {
    "M".to_string()
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            source_url: default_source_url_index(),
            status: default_status_column(),
            timestamp: default_timestamp_column(),
            archived_url: default_archived_url_column(),
        }
    }
}

impl ColumnMap {
    /// A1 range of the status cell for a 1-based row.
    pub fn status_range(&self, row: usize) -> String {
        format!("{}{}", self.status, row)
    }

    /// A1 range of the timestamp cell for a 1-based row.
    pub fn timestamp_range(&self, row: usize) -> String {
        format!("{}{}", self.timestamp, row)
    }

    /// A1 range of the archived-URL cell for a 1-based row.
    pub fn archived_url_range(&self, row: usize) -> String {
        format!("{}{}", self.archived_url, row)
    }

    /// 0-based value index of the status column.
    pub fn status_index(&self) -> usize {
        column_index(&self.status)
    }
}

/// Converts a column letter reference ("A", "K", "AA") to a 0-based index.
///
/// Non-alphabetic characters are ignored, so a full A1 reference like
/// "K5" resolves to the column of "K".
pub fn column_index(letters: &str) -> usize {
    let mut index = 0usize;
    for c in letters.chars() {
        if c.is_ascii_alphabetic() {
            index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
        }
    }
    index.saturating_sub(1)
}

/// Splits an A1 cell reference ("K5") into its 0-based column index and
/// 1-based row number. Returns `None` when either part is missing.
pub fn parse_a1(range: &str) -> Option<(usize, usize)> {
    let letters: String = range.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits: String = range.chars().skip_while(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return None;
    }
    let row = digits.parse::<usize>().ok()?;
    if row == 0 {
        return None;
    }
    Some((column_index(&letters), row))
}

/// Trait for ledger backends.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Read the full value snapshot of a worksheet, rows in order.
    ///
    /// Trailing empty cells may be omitted from individual rows.
    async fn read_all(&self, worksheet: usize) -> Result<Vec<Vec<String>>, LedgerError>;

    /// Write a single cell.
    async fn update_cell(
        &self,
        worksheet: usize,
        range: &str,
        value: &str,
    ) -> Result<(), LedgerError>;

    /// Write several cells in one batched call.
    ///
    /// No atomicity is guaranteed beyond per-call success or failure.
    async fn batch_update(
        &self,
        worksheet: usize,
        updates: Vec<CellUpdate>,
    ) -> Result<(), LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_single_letter() {
        assert_eq!(column_index("A"), 0);
        assert_eq!(column_index("B"), 1);
        assert_eq!(column_index("K"), 10);
        assert_eq!(column_index("Z"), 25);
    }

    #[test]
    fn test_column_index_multi_letter() {
        assert_eq!(column_index("AA"), 26);
        assert_eq!(column_index("AB"), 27);
    }

    #[test]
    fn test_column_index_ignores_digits() {
        assert_eq!(column_index("K5"), 10);
    }

    #[test]
    fn test_parse_a1() {
        assert_eq!(parse_a1("K5"), Some((10, 5)));
        assert_eq!(parse_a1("A1"), Some((0, 1)));
        assert_eq!(parse_a1("AA12"), Some((26, 12)));
        assert_eq!(parse_a1("5"), None);
        assert_eq!(parse_a1("K"), None);
        assert_eq!(parse_a1("K0"), None);
    }

    #[test]
    fn test_column_map_defaults() {
        let columns = ColumnMap::default();
        assert_eq!(columns.source_url, 1);
        assert_eq!(columns.status_range(7), "K7");
        assert_eq!(columns.timestamp_range(7), "L7");
        assert_eq!(columns.archived_url_range(7), "M7");
        assert_eq!(columns.status_index(), 10);
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::WorksheetNotFound(3);
        assert_eq!(err.to_string(), "Worksheet not found: index 3");
    }
}
