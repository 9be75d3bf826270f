use crate::config::types::{Config, ConfigOverrides, SheetConfig, SheetCredentials};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;

/// Environment variable that supplies the spreadsheet identifier
pub const SPREADSHEET_ID_ENV: &str = "SPREADSHEET_ID";

/// Environment variable that supplies the worksheet name
pub const SHEET_NAME_ENV: &str = "SHEET_NAME";

/// Loads the configuration
///
/// Layers are applied in order: a `.env` file in the working directory (if
/// any) is loaded into the process environment, the TOML file at `path` (or
/// built-in defaults when `path` is `None`), environment overrides, and
/// finally the command-line `overrides`. The result is validated.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
/// * `overrides` - Values from the command line
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use listing_scout::config::{load_config, ConfigOverrides};
/// use std::path::Path;
///
/// let config = load_config(Some(Path::new("scout.toml")), &ConfigOverrides::default()).unwrap();
/// println!("Sheet: {}", config.sheet.sheet_name);
/// ```
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    // A missing .env is the common case outside development
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    load_config_from(path, overrides, |key| std::env::var(key).ok())
}

/// Loads the configuration with environment values resolved by `lookup`
///
/// Same layering as [`load_config`] minus the `.env` file, and without
/// touching the process environment.
pub fn load_config_from<F>(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
    lookup: F,
) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    apply_env(&mut config, lookup);
    apply_overrides(&mut config, overrides);

    validate(&config)?;

    Ok(config)
}

/// Parses configuration from TOML text without validating it
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlays environment values onto the configuration
///
/// `lookup` resolves a variable name to its value; blank values are ignored.
pub fn apply_env<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(id) = non_blank(SPREADSHEET_ID_ENV) {
        config.sheet.spreadsheet_id = Some(id);
    }

    if let Some(name) = non_blank(SHEET_NAME_ENV) {
        config.sheet.sheet_name = name;
    }
}

/// Applies command-line overrides to the configuration
pub fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(delay) = overrides.launch_delay_ms {
        config.crawler.launch_delay_ms = delay;
    }

    if let Some(name) = &overrides.sheet_name {
        config.sheet.sheet_name = name.clone();
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and, when a file was
/// given, the hash of its content
pub fn load_config_with_hash(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<(Config, Option<String>), ConfigError> {
    let config = load_config(path, overrides)?;
    let hash = path.map(compute_config_hash).transpose()?;
    Ok((config, hash))
}

impl Config {
    /// Pause between two worker launches
    pub fn launch_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.launch_delay_ms)
    }
}

impl SheetConfig {
    /// Resolves the spreadsheet id and bearer token from the process environment
    pub fn credentials(&self) -> Result<SheetCredentials, ConfigError> {
        self.credentials_from(|key| std::env::var(key).ok())
    }

    /// Resolves credentials using `lookup` for environment access
    pub fn credentials_from<F>(&self, lookup: F) -> Result<SheetCredentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let spreadsheet_id = self
            .spreadsheet_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingEnv(format!(
                    "spreadsheet id (set [sheet] spreadsheet-id or {})",
                    SPREADSHEET_ID_ENV
                ))
            })?;

        let token = lookup(&self.token_env)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv(self.token_env.clone()))?;

        Ok(SheetCredentials {
            spreadsheet_id,
            token,
        })
    }
}
