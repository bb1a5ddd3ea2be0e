//! Spreadsheet REST ledger implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::LedgerConfig;

use super::types::{CellUpdate, LedgerError, LedgerGateway};

/// Ledger backend over a Google-Sheets-shaped values API.
pub struct SheetsLedger {
    client: Client,
    config: LedgerConfig,
    // Worksheet titles by index, fetched once per process lifetime.
    sheet_titles: RwLock<Option<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsLedger {
    /// Create a new ledger gateway with the given configuration.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| LedgerError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            sheet_titles: RwLock::new(None),
        })
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(&self.config.spreadsheet_id)
        )
    }

    fn map_transport_error(e: reqwest::Error) -> LedgerError {
        if e.is_timeout() {
            LedgerError::Timeout
        } else if e.is_connect() {
            LedgerError::ConnectionFailed(e.to_string())
        } else {
            LedgerError::ApiError(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LedgerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(200).collect();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(LedgerError::AuthenticationFailed(format!(
                "HTTP {}: {}",
                status, excerpt
            )))
        } else {
            Err(LedgerError::ApiError(format!("HTTP {}: {}", status, excerpt)))
        }
    }

    /// Resolve a worksheet index to its sheet title, fetching and caching
    /// the spreadsheet metadata on first use.
    async fn worksheet_title(&self, worksheet: usize) -> Result<String, LedgerError> {
        {
            let titles = self.sheet_titles.read().await;
            if let Some(titles) = titles.as_ref() {
                return titles
                    .get(worksheet)
                    .cloned()
                    .ok_or(LedgerError::WorksheetNotFound(worksheet));
            }
        }

        let url = format!("{}?fields=sheets.properties.title", self.spreadsheet_url());
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let meta: SpreadsheetMeta = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| LedgerError::ApiError(format!("Failed to parse metadata: {}", e)))?;

        let titles: Vec<String> = meta.sheets.into_iter().map(|s| s.properties.title).collect();
        debug!(sheets = titles.len(), "Fetched spreadsheet metadata");

        let title = titles.get(worksheet).cloned();
        *self.sheet_titles.write().await = Some(titles);

        title.ok_or(LedgerError::WorksheetNotFound(worksheet))
    }

    fn qualified_range(title: &str, range: &str) -> String {
        format!("{}!{}", title, range)
    }
}

#[async_trait]
impl LedgerGateway for SheetsLedger {
    fn name(&self) -> &str {
        "sheets"
    }

    async fn read_all(&self, worksheet: usize) -> Result<Vec<Vec<String>>, LedgerError> {
        let title = self.worksheet_title(worksheet).await?;
        let url = format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(&title)
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let range: ValueRange = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| LedgerError::ApiError(format!("Failed to parse values: {}", e)))?;

        debug!(worksheet, rows = range.values.len(), "Read worksheet snapshot");
        Ok(range.values)
    }

    async fn update_cell(
        &self,
        worksheet: usize,
        range: &str,
        value: &str,
    ) -> Result<(), LedgerError> {
        let title = self.worksheet_title(worksheet).await?;
        let qualified = Self::qualified_range(&title, range);
        let url = format!(
            "{}/values/{}?valueInputOption=RAW",
            self.spreadsheet_url(),
            urlencoding::encode(&qualified)
        );

        let body = json!({
            "range": qualified,
            "values": [[value]],
        });

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(response).await?;

        debug!(worksheet, range, "Updated ledger cell");
        Ok(())
    }

    async fn batch_update(
        &self,
        worksheet: usize,
        updates: Vec<CellUpdate>,
    ) -> Result<(), LedgerError> {
        let title = self.worksheet_title(worksheet).await?;
        let url = format!("{}/values:batchUpdate", self.spreadsheet_url());

        let data: Vec<_> = updates
            .iter()
            .map(|u| {
                json!({
                    "range": Self::qualified_range(&title, &u.range),
                    "values": [[u.value]],
                })
            })
            .collect();
        let body = json!({
            "valueInputOption": "RAW",
            "data": data,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(response).await?;

        debug!(worksheet, cells = updates.len(), "Batched ledger update");
        Ok(())
    }
}
