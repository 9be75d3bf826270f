//! Crawler coordinator - concurrent crawl orchestration
//!
//! The coordinator launches one worker task per listing URL, pausing for the
//! configured launch delay between launches, and gathers the records the
//! workers send back into a single batch.
//!
//! Completion tracking rides on the channel itself: every worker owns one
//! sender clone and reports exactly one outcome through it, whether it built a
//! record, skipped a blank URL, or failed. The channel closes once the
//! launcher and every worker have dropped their senders.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::record::build_record;
use crate::output::{Batch, Record};
use crate::{Result, ScoutError};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// What one worker reports back
#[derive(Debug)]
enum WorkerOutcome {
    /// A record was built
    Record(Record),
    /// The URL was blank
    Skipped,
    /// Fetching or parsing failed; ends the whole run
    Failed(ScoutError),
}

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    launch_delay: Duration,
    detail_suffix: Arc<str>,
}

impl Coordinator {
    /// Creates a new coordinator from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScoutError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.crawler)?;

        Ok(Self::with_client(
            client,
            config.launch_delay(),
            &config.crawler.detail_suffix,
        ))
    }

    /// Creates a coordinator around an existing HTTP client
    pub fn with_client(client: Client, launch_delay: Duration, detail_suffix: &str) -> Self {
        Self {
            client,
            launch_delay,
            detail_suffix: Arc::from(detail_suffix),
        }
    }

    /// Crawls every URL and returns the records in completion order
    ///
    /// URLs are launched in input order, one worker each, with the launch
    /// delay between consecutive launches. All launched workers run
    /// concurrently. Blank URLs produce no record.
    ///
    /// # Returns
    ///
    /// * `Ok(Batch)` - One record per non-blank URL
    /// * `Err(ScoutError)` - The first worker failure; all other workers are
    ///   aborted and no partial batch is returned
    pub async fn run(&self, urls: &[String]) -> Result<Batch> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} urls, launch delay {:?}",
            urls.len(),
            self.launch_delay
        );

        // Each worker sends exactly once, so this capacity never blocks
        let (tx, mut rx) = mpsc::channel::<WorkerOutcome>(urls.len().max(1));
        let mut launcher_tx = Some(tx);
        let mut workers = JoinSet::new();
        let mut pending = urls.iter().peekable();

        let throttle = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(throttle);

        if pending.peek().is_none() {
            launcher_tx = None;
        }

        let mut batch = Batch::with_capacity(urls.len());
        let mut launched = 0usize;
        let mut skipped = 0usize;

        loop {
            tokio::select! {
                () = &mut throttle, if launcher_tx.is_some() => {
                    if let (Some(raw), Some(tx)) = (pending.next(), launcher_tx.as_ref()) {
                        launched += 1;
                        tracing::debug!("Launching worker {} for {}", launched, raw);
                        workers.spawn(run_worker(
                            self.client.clone(),
                            raw.clone(),
                            Arc::clone(&self.detail_suffix),
                            tx.clone(),
                        ));
                    }

                    if pending.peek().is_some() {
                        throttle.as_mut().reset(tokio::time::Instant::now() + self.launch_delay);
                    } else {
                        // Last launch done; the launcher's sender must go so the channel can close
                        launcher_tx = None;
                    }
                }

                outcome = rx.recv() => match outcome {
                    Some(WorkerOutcome::Record(record)) => {
                        tracing::info!(
                            "Completed {} ({} values), {} records so far",
                            record.get(1).map(String::as_str).unwrap_or_default(),
                            record.len(),
                            batch.len() + 1
                        );
                        batch.push(record);
                    }
                    Some(WorkerOutcome::Skipped) => skipped += 1,
                    Some(WorkerOutcome::Failed(e)) => {
                        tracing::error!("Worker failed, aborting crawl: {}", e);
                        workers.abort_all();
                        return Err(e);
                    }
                    None => break,
                }
            }
        }

        // A panicked worker drops its sender without reporting
        while let Some(joined) = workers.join_next().await {
            joined?;
        }

        tracing::info!(
            "Crawl finished: {} launched, {} records, {} skipped in {:?}",
            launched,
            batch.len(),
            skipped,
            start_time.elapsed()
        );

        Ok(batch)
    }
}

/// Builds one record and reports the outcome exactly once
async fn run_worker(
    client: Client,
    raw_url: String,
    detail_suffix: Arc<str>,
    tx: mpsc::Sender<WorkerOutcome>,
) {
    let outcome = match build_record(&client, &raw_url, &detail_suffix).await {
        Ok(Some(record)) => WorkerOutcome::Record(record),
        Ok(None) => WorkerOutcome::Skipped,
        Err(e) => WorkerOutcome::Failed(e),
    };

    // The receiver is gone only when the run already ended
    if tx.send(outcome).await.is_err() {
        tracing::debug!("Dropping outcome for {}: crawl already finished", raw_url);
    }
}

/// Runs a complete crawl with a coordinator built from `config`
///
/// # Example
///
/// ```no_run
/// use listing_scout::config::{load_config, ConfigOverrides};
/// use listing_scout::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(None, &ConfigOverrides::default())?;
/// let urls = vec!["https://example.com/build/1".to_string()];
/// let batch = run_crawl(&config, &urls).await?;
/// println!("{} records", batch.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, urls: &[String]) -> Result<Batch> {
    Coordinator::new(config)?.run(urls).await
}
