//! Pagination driver for one container.

use crate::api::{CredentialProvider, RedditApi};
use crate::batch::{process_batch, BatchContext, BatchOutcome};
use crate::config::ScrapeOptions;
use crate::date::epoch_to_rfc3339;
use crate::error::Result;
use crate::progress::ProgressScope;
use crate::store::RecordStore;
use std::fmt;

/// Why the driver stopped. All of them are successful completions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The latest page reached posts older than the age floor.
    AgeExhausted,
    /// The listing stopped handing out new cursors.
    CursorStalled,
    /// The post budget is spent.
    CountSatisfied,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::AgeExhausted => "age floor reached",
            StopReason::CursorStalled => "listing exhausted",
            StopReason::CountSatisfied => "post budget reached",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub container: String,
    pub fetched: usize,
    pub batches: usize,
    pub comment_fetches: usize,
    pub reused: usize,
    pub stop: StopReason,
}

/// Page size for the next request: what is left of the budget, capped.
pub fn next_page_size(max_post_count: usize, fetched: usize, page_cap: usize) -> usize {
    max_post_count.saturating_sub(fetched).min(page_cap).max(1)
}

/// Apply the stop conditions after a batch. `previous_after` is the cursor the
/// batch was requested with and must not have been overwritten yet.
///
/// A missing cursor counts as stalled too: requesting again without one would
/// restart the listing from the top.
pub fn stop_reason(
    outcome: &BatchOutcome,
    previous_after: Option<&str>,
    total_fetched: usize,
    opts: &ScrapeOptions,
) -> Option<StopReason> {
    if outcome.oldest_created_utc < opts.age_floor {
        return Some(StopReason::AgeExhausted);
    }
    match outcome.after.as_deref() {
        None => return Some(StopReason::CursorStalled),
        Some(next) if Some(next) == previous_after => return Some(StopReason::CursorStalled),
        Some(_) => {}
    }
    if total_fetched >= opts.max_post_count {
        return Some(StopReason::CountSatisfied);
    }
    None
}

/// Validate, obtain a token, then page through the listing until a stop condition holds.
pub fn scrape_container(
    api: &dyn RedditApi,
    credentials: &dyn CredentialProvider,
    store: &dyn RecordStore,
    opts: &ScrapeOptions,
) -> Result<ScrapeSummary> {
    opts.validate()?;
    tracing::info!(
        container = %opts.container,
        max_post_count = opts.max_post_count,
        age_floor = %epoch_to_rfc3339(opts.age_floor),
        "starting scrape"
    );
    let token = credentials.access_token()?;
    let ctx = BatchContext { api, store, token: &token };
    paginate(&ctx, opts)
}

/// The driver loop proper, for callers that already hold a token.
pub fn paginate(ctx: &BatchContext<'_>, opts: &ScrapeOptions) -> Result<ScrapeSummary> {
    let container = opts.container.as_str();
    let progress = ProgressScope::posts(container, opts.max_post_count as u64, opts.progress);

    let mut last_after: Option<String> = None;
    let mut summary = ScrapeSummary {
        container: container.to_string(),
        fetched: 0,
        batches: 0,
        comment_fetches: 0,
        reused: 0,
        stop: StopReason::CountSatisfied,
    };

    loop {
        let size = next_page_size(opts.max_post_count, summary.fetched, opts.page_cap);
        let outcome = process_batch(ctx, container, size, last_after.as_deref())?;

        summary.fetched += outcome.fetched;
        summary.batches += 1;
        summary.comment_fetches += outcome.comment_fetches;
        summary.reused += outcome.reused;
        progress.inc(outcome.fetched as u64);

        tracing::info!(
            container,
            after = outcome.after.as_deref().unwrap_or("-"),
            "Successfully fetched another {} posts (now {} in total).",
            outcome.fetched,
            summary.fetched
        );

        if let Some(reason) = stop_reason(&outcome, last_after.as_deref(), summary.fetched, opts) {
            tracing::info!(container, "Stopping: {}.", reason);
            summary.stop = reason;
            break;
        }
        last_after = outcome.after;
    }

    progress.finish(format!("r/{container}: {} posts", summary.fetched));
    Ok(summary)
}
