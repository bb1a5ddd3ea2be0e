//! Mock ledger for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ledger::{parse_a1, CellUpdate, LedgerError, LedgerGateway};

/// A recorded write for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    /// Worksheet the write targeted.
    pub worksheet: usize,
    /// The cells written.
    pub updates: Vec<CellUpdate>,
    /// Whether the write went through `batch_update`.
    pub batched: bool,
}

/// Mock implementation of the LedgerGateway trait.
///
/// Holds worksheets as in-memory value grids and applies writes to them,
/// so tests can assert on both the write log and the final cell state.
///
/// # Example
///
/// ```rust,ignore
/// let ledger = MockLedger::new();
/// ledger.set_worksheet(0, vec![fixtures::job_row("https://x", "")]).await;
///
/// // ... run the orchestrator ...
///
/// assert_eq!(ledger.cell(0, "K1").await, "successful");
/// assert_eq!(ledger.writes().await.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockLedger {
    worksheets: RwLock<Vec<Vec<Vec<String>>>>,
    writes: RwLock<Vec<RecordedWrite>>,
    next_error: RwLock<Option<LedgerError>>,
}

impl MockLedger {
    /// Create a new mock ledger with no worksheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rows of a worksheet, growing the worksheet list as needed.
    pub async fn set_worksheet(&self, index: usize, rows: Vec<Vec<String>>) {
        let mut worksheets = self.worksheets.write().await;
        if worksheets.len() <= index {
            worksheets.resize(index + 1, Vec::new());
        }
        worksheets[index] = rows;
    }

    /// All recorded writes, in call order.
    pub async fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.read().await.clone()
    }

    /// Current value of a cell, by A1 reference ("K5"). Empty string for
    /// cells that were never written.
    pub async fn cell(&self, worksheet: usize, range: &str) -> String {
        let Some((col, row)) = parse_a1(range) else {
            return String::new();
        };
        self.worksheets
            .read()
            .await
            .get(worksheet)
            .and_then(|rows| rows.get(row - 1))
            .and_then(|values| values.get(col))
            .cloned()
            .unwrap_or_default()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: LedgerError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<LedgerError> {
        self.next_error.write().await.take()
    }

    async fn apply(&self, worksheet: usize, updates: &[CellUpdate]) -> Result<(), LedgerError> {
        let mut worksheets = self.worksheets.write().await;
        let rows = worksheets
            .get_mut(worksheet)
            .ok_or(LedgerError::WorksheetNotFound(worksheet))?;

        for update in updates {
            let Some((col, row)) = parse_a1(&update.range) else {
                return Err(LedgerError::ApiError(format!(
                    "invalid range: {}",
                    update.range
                )));
            };
            if rows.len() < row {
                rows.resize(row, Vec::new());
            }
            let values = &mut rows[row - 1];
            if values.len() <= col {
                values.resize(col + 1, String::new());
            }
            values[col] = update.value.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerGateway for MockLedger {
    fn name(&self) -> &str {
        "mock"
    }

    async fn read_all(&self, worksheet: usize) -> Result<Vec<Vec<String>>, LedgerError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.worksheets
            .read()
            .await
            .get(worksheet)
            .cloned()
            .ok_or(LedgerError::WorksheetNotFound(worksheet))
    }

    async fn update_cell(
        &self,
        worksheet: usize,
        range: &str,
        value: &str,
    ) -> Result<(), LedgerError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let updates = vec![CellUpdate::new(range, value)];
        self.apply(worksheet, &updates).await?;
        self.writes.write().await.push(RecordedWrite {
            worksheet,
            updates,
            batched: false,
        });
        Ok(())
    }

    async fn batch_update(
        &self,
        worksheet: usize,
        updates: Vec<CellUpdate>,
    ) -> Result<(), LedgerError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.apply(worksheet, &updates).await?;
        self.writes.write().await.push(RecordedWrite {
            worksheet,
            updates,
            batched: true,
        });
        Ok(())
    }
}
