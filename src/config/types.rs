use crate::output::ColumnSchema;
use crate::url::DEFAULT_DETAIL_SUFFIX;
use serde::Deserialize;

/// Main configuration structure for Listing-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub sheet: SheetConfig,

    /// Column header row the destination sheet must carry
    #[serde(skip)]
    pub columns: ColumnSchema,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause between launching two listing workers (milliseconds)
    #[serde(rename = "launch-delay-ms", default = "default_launch_delay_ms")]
    pub launch_delay_ms: u64,

    /// Path suffix appended to a listing URL to reach its detail page
    #[serde(rename = "detail-suffix", default = "default_detail_suffix")]
    pub detail_suffix: String,

    /// User-Agent header sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            launch_delay_ms: default_launch_delay_ms(),
            detail_suffix: default_detail_suffix(),
            user_agent: default_user_agent(),
        }
    }
}

/// Destination spreadsheet configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet identifier (falls back to `SPREADSHEET_ID`)
    #[serde(rename = "spreadsheet-id", default)]
    pub spreadsheet_id: Option<String>,

    /// Worksheet (tab) name
    #[serde(rename = "sheet-name", default = "default_sheet_name")]
    pub sheet_name: String,

    /// Base URL of the Sheets REST API
    #[serde(rename = "api-base", default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the OAuth bearer token
    #[serde(rename = "token-env", default = "default_token_env")]
    pub token_env: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name: default_sheet_name(),
            api_base: default_api_base(),
            token_env: default_token_env(),
        }
    }
}

/// Resolved credentials for the Sheets sink
#[derive(Clone)]
pub struct SheetCredentials {
    pub spreadsheet_id: String,
    pub token: String,
}

impl std::fmt::Debug for SheetCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetCredentials")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub launch_delay_ms: Option<u64>,
    pub sheet_name: Option<String>,
}

fn default_launch_delay_ms() -> u64 {
    500
}

fn default_detail_suffix() -> String {
    DEFAULT_DETAIL_SUFFIX.to_string()
}

fn default_user_agent() -> String {
    format!("listing-scout/{}", env!("CARGO_PKG_VERSION"))
}

fn default_sheet_name() -> String {
    "Main".to_string()
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_token_env() -> String {
    "GOOGLE_SHEETS_TOKEN".to_string()
}
