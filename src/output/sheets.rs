//! Google Sheets row sink
//!
//! Talks to the Sheets v4 REST API with a caller-supplied OAuth bearer token.
//! Minting or refreshing that token is not handled here.

use crate::config::{SheetConfig, SheetCredentials};
use crate::output::traits::{Record, RowSink};
use crate::{SinkError, SinkResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use url::Url;

/// Values are interpreted as if typed into the UI, so formulas stay live
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// A `ValueRange` as returned by `values.get`
#[derive(Debug, Default, Deserialize)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// A `ValueRange` request body for `values.update` and `values.append`
#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: Vec<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct ClearValuesBody {}

/// Row sink writing to one worksheet of a Google spreadsheet
#[derive(Clone)]
pub struct SheetsSink {
    client: Client,
    api_base: Url,
    spreadsheet_id: String,
    sheet_name: String,
    token: String,
}

impl SheetsSink {
    /// Creates a sink for the worksheet described by `config`
    ///
    /// # Returns
    ///
    /// * `Ok(SheetsSink)` - Sink ready to use
    /// * `Err(SinkError)` - The API base URL is unusable or the client failed to build
    pub fn new(config: &SheetConfig, credentials: SheetCredentials) -> SinkResult<Self> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| SinkError::Endpoint(format!("{}: {}", config.api_base, e)))?;

        if api_base.cannot_be_a_base() {
            return Err(SinkError::Endpoint(config.api_base.clone()));
        }

        Ok(Self {
            client: Client::builder().build()?,
            api_base,
            spreadsheet_id: credentials.spreadsheet_id,
            sheet_name: config.sheet_name.clone(),
            token: credentials.token,
        })
    }

    /// A1 range covering the whole header row
    fn header_range(&self) -> String {
        format!("{}!1:1", self.sheet_name)
    }

    /// A1 range anchoring appends at the first column
    fn append_range(&self) -> String {
        format!("{}!A1:A1", self.sheet_name)
    }

    /// Builds `{base}/v4/spreadsheets/{id}/values/{range}[:{action}]`
    fn values_url(&self, range: &str, action: Option<&str>) -> SinkResult<Url> {
        let last = match action {
            Some(action) => format!("{}:{}", range, action),
            None => range.to_string(),
        };

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SinkError::Endpoint(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", last.as_str()]);

        Ok(url)
    }

    /// Turns a non-success response into a `SinkError::Status`
    async fn check(response: Response) -> SinkResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RowSink for SheetsSink {
    async fn read_header(&self) -> SinkResult<Vec<String>> {
        let url = self.values_url(&self.header_range(), None)?;
        tracing::debug!("Reading header row from {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await?;

        let range: ValueRangeResponse = Self::check(response).await?.json().await?;
        Ok(range.values.into_iter().next().unwrap_or_default())
    }

    async fn clear_header(&self) -> SinkResult<()> {
        let url = self.values_url(&self.header_range(), Some("clear"))?;
        tracing::debug!("Clearing header row via {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&ClearValuesBody {})
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn write_header(&self, header: &[String]) -> SinkResult<()> {
        let range = self.header_range();
        let url = self.values_url(&range, None)?;
        tracing::debug!("Writing header row via {}", url);

        let body = ValueRangeBody {
            range: &range,
            major_dimension: "ROWS",
            values: vec![header],
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", VALUE_INPUT_OPTION)])
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn append_rows(&self, rows: &[Record]) -> SinkResult<()> {
        let range = self.append_range();
        let url = self.values_url(&range, Some("append"))?;
        tracing::debug!("Appending {} rows via {}", rows.len(), url);

        let body = ValueRangeBody {
            range: &range,
            major_dimension: "ROWS",
            values: rows.iter().map(|record| record.values()).collect(),
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
