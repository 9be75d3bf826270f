//! Page record builder
//!
//! Turns one listing URL into one record by fetching the listing page and its
//! detail page and running every extractor over them in column order.

use crate::crawler::extract;
use crate::crawler::fetcher::fetch_document;
use crate::output::Record;
use crate::url::ListingUrl;
use crate::Result;
use reqwest::Client;

/// Builds the record for one raw listing URL
///
/// The listing page is fetched first, then the detail page
/// (`url + detail_suffix`). Extractors run in the order name, link, price per
/// area, intro info, community plan (listing page) and sub-detail (detail
/// page).
///
/// # Returns
///
/// * `Ok(Some(Record))` - The listing's record
/// * `Ok(None)` - The URL was blank and was skipped
/// * `Err(ScoutError)` - The URL was invalid or a fetch failed
pub async fn build_record(
    client: &Client,
    raw_url: &str,
    detail_suffix: &str,
) -> Result<Option<Record>> {
    let Some(url) = ListingUrl::parse(raw_url)? else {
        tracing::info!("Skipping empty url");
        return Ok(None);
    };

    tracing::info!("Crawling {}", url);

    // The parsed page is dropped before the next await so the task stays Send
    let mut record = {
        let main_doc = fetch_document(client, url.as_str()).await?;
        Record::new(extract::main_page_fields(&main_doc, &url))
    };

    let detail_url = url.detail_url(detail_suffix);
    let detail_doc = fetch_document(client, &detail_url).await?;
    record.extend_group(extract::sub_detail(&detail_doc));

    tracing::debug!("Extracted {} values from {}", record.len(), url);

    Ok(Some(record))
}
