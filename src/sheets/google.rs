//! Google Sheets v4 client
//!
//! Implements SheetClient over the `spreadsheets.values` REST endpoints
//! using an OAuth access token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{Result, SyncError};
use crate::sheets::client::SheetClient;

/// Default Sheets API base URL
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Google Sheets API client
pub struct GoogleSheetsClient {
    client: Client,
    access_token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl GoogleSheetsClient {
    /// Create a client against the public Sheets API
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(access_token, DEFAULT_SHEETS_API_URL, timeout)
    }

    /// Create a client with an explicit base URL
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Sheets(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL for `spreadsheets/{id}/values/{range}`, with the range encoded as one segment
    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SyncError::Sheets(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::Sheets(format!("Base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(SyncError::Sheets(format!("API error {}: {}", status, body)))
    }
}

/// Flatten a JSON value grid into strings
fn stringify_values(values: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    Value::Bool(b) => if b { "TRUE" } else { "FALSE" }.to_string(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[async_trait]
impl SheetClient for GoogleSheetsClient {
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(spreadsheet_id, range)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| SyncError::Sheets(format!("Request failed: {}", e)))?;

        let body: ValueRange = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SyncError::Sheets(format!("Failed to parse response: {}", e)))?;

        Ok(stringify_values(body.values))
    }

    async fn update_cell(&self, spreadsheet_id: &str, range: &str, value: &str) -> Result<()> {
        let url = self.values_url(spreadsheet_id, range)?;
        log::debug!("PUT {}", url);

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[value]]
        });

        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::Sheets(format!("Request failed: {}", e)))?;

        Self::check_status(response).await?;
        Ok(())
    }
}
