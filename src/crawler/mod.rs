//! Crawler module for listing page fetching and extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching of listing and detail pages
//! - Field extraction from parsed pages
//! - Building one record per listing
//! - Concurrent crawl coordination with a throttled launcher

mod coordinator;
pub mod extract;
mod fetcher;
mod record;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_document, fetch_page};
pub use record::build_record;

use crate::config::Config;
use crate::output::{ensure_header, write_batch, HeaderAction, RowSink};
use crate::Result;

/// Outcome of a complete harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestReport {
    /// What was done to the destination header row
    pub header: HeaderAction,
    /// Number of rows appended
    pub rows_written: usize,
}

/// Runs a complete harvest
///
/// This is the main entry point. It will:
/// 1. Make sure the destination header row matches the column schema
/// 2. Crawl every listing URL concurrently
/// 3. Append all records to the destination in one write
///
/// Any failure stops the harvest; nothing is appended unless every listing
/// was crawled successfully.
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `sink` - The destination for header and rows
/// * `urls` - Raw listing URLs, in launch order
pub async fn harvest(
    config: &Config,
    sink: &dyn RowSink,
    urls: &[String],
) -> Result<HarvestReport> {
    let coordinator = Coordinator::new(config)?;
    harvest_with(&coordinator, config, sink, urls).await
}

/// Runs a complete harvest with an already built coordinator
pub async fn harvest_with(
    coordinator: &Coordinator,
    config: &Config,
    sink: &dyn RowSink,
    urls: &[String],
) -> Result<HarvestReport> {
    let header = ensure_header(sink, &config.columns).await?;
    let batch = coordinator.run(urls).await?;
    let rows_written = write_batch(sink, &batch).await?;

    Ok(HarvestReport {
        header,
        rows_written,
    })
}
