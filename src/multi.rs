//! Sequential harvest over several containers with per-container outcomes.

use crate::api::{CredentialProvider, RedditApi};
use crate::config::HarvestOptions;
use crate::date::now_epoch;
use crate::error::{Result, ScrapeError};
use crate::scrape::{scrape_container, ScrapeSummary};
use crate::store::RecordStore;

#[derive(Debug)]
pub struct ContainerOutcome {
    pub container: String,
    pub result: std::result::Result<ScrapeSummary, ScrapeError>,
}

impl ContainerOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct HarvestReport {
    pub results: Vec<ContainerOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl HarvestReport {
    /// True when there was at least one container and none succeeded.
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.success_count == 0
    }
}

/// Scrape each container in order. Invalid options fail the whole run before any
/// request; a container that fails mid-scrape is recorded and the next one runs.
pub fn scrape_many(
    api: &dyn RedditApi,
    credentials: &dyn CredentialProvider,
    store: &dyn RecordStore,
    opts: &HarvestOptions,
) -> Result<HarvestReport> {
    opts.validate()?;
    let age_floor = opts.age_floor(now_epoch());
    let total = opts.containers.len();
    let mut report = HarvestReport::default();

    for (i, container) in opts.containers.iter().enumerate() {
        tracing::info!("Scraping subreddit {}/{}: {}", i + 1, total, container);
        let scrape_opts = opts.scrape_options_for(container, age_floor);
        let result = scrape_container(api, credentials, store, &scrape_opts);
        match &result {
            Ok(_) => report.success_count += 1,
            Err(e) => {
                report.failure_count += 1;
                tracing::error!(container = %container, kind = ?e.kind(), "Failed to scrape {}: {}", container, e);
            }
        }
        report.results.push(ContainerOutcome { container: container.clone(), result });
    }

    if total > 1 {
        tracing::info!(
            "Scraping complete: {} succeeded, {} failed",
            report.success_count,
            report.failure_count
        );
    }
    Ok(report)
}
