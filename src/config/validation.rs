use crate::config::types::{Config, CrawlerConfig, SheetConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the launch delay; anything larger is almost surely a typo
const MAX_LAUNCH_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_sheet_config(&config.sheet)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.launch_delay_ms > MAX_LAUNCH_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "launch_delay_ms must be <= {}ms, got {}ms",
            MAX_LAUNCH_DELAY_MS, config.launch_delay_ms
        )));
    }

    if !config.detail_suffix.starts_with('/') || config.detail_suffix.len() < 2 {
        return Err(ConfigError::Validation(format!(
            "detail_suffix must be a path segment starting with '/', got '{}'",
            config.detail_suffix
        )));
    }

    if config.detail_suffix.contains(['?', '#']) {
        return Err(ConfigError::Validation(format!(
            "detail_suffix cannot contain a query or fragment, got '{}'",
            config.detail_suffix
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates destination sheet configuration
fn validate_sheet_config(config: &SheetConfig) -> Result<(), ConfigError> {
    if config.sheet_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sheet_name cannot be empty".to_string(),
        ));
    }

    // '!' separates the sheet from the cell range in A1 notation
    if config.sheet_name.contains('!') {
        return Err(ConfigError::Validation(format!(
            "sheet_name cannot contain '!', got '{}'",
            config.sheet_name
        )));
    }

    let base = Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base: {}", e)))?;

    if base.scheme() != "https" && base.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_base must use HTTP(S), got '{}'",
            config.api_base
        )));
    }

    if config.token_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "token_env cannot be empty".to_string(),
        ));
    }

    Ok(())
}
