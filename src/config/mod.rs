//! Configuration module for Listing-Scout
//!
//! This module loads the optional TOML configuration file, overlays values
//! from the environment (including a `.env` file) and the command line, and
//! validates the result.
//!
//! # Example
//!
//! ```no_run
//! use listing_scout::config::{load_config, ConfigOverrides};
//!
//! let config = load_config(None, &ConfigOverrides::default()).unwrap();
//! println!("Launch delay: {:?}", config.launch_delay());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ConfigOverrides, CrawlerConfig, SheetConfig, SheetCredentials};

// Re-export parser functions
pub use parser::{
    apply_env, apply_overrides, compute_config_hash, load_config, load_config_from,
    load_config_with_hash, parse_config, SHEET_NAME_ENV, SPREADSHEET_ID_ENV,
};
pub use validation::validate;
