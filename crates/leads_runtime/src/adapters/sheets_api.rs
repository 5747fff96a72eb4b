//! Google Sheets v4 values API, one tab per store.
//!
//! The access token is taken as given; minting and refreshing it is left to
//! the deployment environment.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use super::row_store::{column_letters, RowStore, SheetRows, StoreError};

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by every tab of one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsApiConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct SheetsApiStore {
    client: Client,
    config: SheetsApiConfig,
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsApiStore {
    pub fn new(config: SheetsApiConfig, title: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, config, title))
    }

    pub fn with_client(client: Client, config: SheetsApiConfig, title: impl Into<String>) -> Self {
        Self {
            client,
            config,
            title: title.into(),
        }
    }

    /// `values/{range}` URL for this spreadsheet, with an optional `:verb` suffix.
    fn values_url(&self, range: &str, verb: Option<&str>) -> Result<Url, StoreError> {
        let mut url = Url::parse(self.config.api_base.trim_end_matches('/'))
            .map_err(|error| StoreError::InvalidUrl(error.to_string()))?;
        let segment = match verb {
            Some(verb) => format!("{range}:{verb}"),
            None => range.to_string(),
        };
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.config.api_base.clone()))?
            .pop_if_empty()
            .extend(["spreadsheets", self.config.spreadsheet_id.as_str(), "values"])
            .push(&segment);
        Ok(url)
    }

    fn quoted_title(&self) -> String {
        format!("'{}'", self.title.replace('\'', "''"))
    }
}

fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        body,
    })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl RowStore for SheetsApiStore {
    fn title(&self) -> &str {
        &self.title
    }

    fn read_rows(&self) -> Result<SheetRows, StoreError> {
        let url = self.values_url(&self.quoted_title(), None)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()?;
        let range: ValueRange = check_status(response)?.json()?;

        let grid = range
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        Ok(SheetRows::from_grid(grid))
    }

    fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<(), StoreError> {
        if row == 0 || column == 0 {
            return Err(StoreError::OutOfRange {
                sheet: self.title.clone(),
                row,
                column,
            });
        }
        let range = format!("{}!{}{row}", self.quoted_title(), column_letters(column));
        let mut url = self.values_url(&range, None)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "range": range, "values": [[value]] }))
            .send()?;
        check_status(response).map(|_| ())
    }

    fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        let mut url = self.values_url(&self.quoted_title(), Some("append"))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "values": [values] }))
            .send()?;
        check_status(response).map(|_| ())
    }
}
