//! One page of the listing: per-post comment decision, flattening, persistence.

use crate::api::RedditApi;
use crate::error::Result;
use crate::flatten::flatten_comments;
use crate::models::{Comment, Post, PostData, PostKey};
use crate::store::RecordStore;

/// What to do about a post's comments this run.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentPlan {
    /// Stored count matches the fresh one: keep the stored comments, no request.
    Reuse(Vec<Comment>),
    /// The post has no comments: persist an empty list, no request.
    Empty,
    /// Fetch and flatten the comment tree.
    Fetch,
}

/// Decide from the previously stored record (if any) and the fresh comment count.
/// The stored count is compared first, so a post whose stored and fresh counts are
/// both zero keeps whatever was stored.
pub fn plan_comments(prior: Option<Post>, fresh_count: u64) -> CommentPlan {
    match prior {
        Some(p) if p.data.num_comments == fresh_count => CommentPlan::Reuse(p.flattened_comments),
        _ if fresh_count == 0 => CommentPlan::Empty,
        _ => CommentPlan::Fetch,
    }
}

/// Result of one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub fetched: usize,
    /// Cursor for the next page, as returned by the listing.
    pub after: Option<String>,
    /// `created_utc` of the last post of the page; 0 for an empty page.
    pub oldest_created_utc: i64,
    pub comment_fetches: usize,
    pub reused: usize,
}

/// Collaborators a batch needs. The token is fetched once per scrape.
pub struct BatchContext<'a> {
    pub api: &'a dyn RedditApi,
    pub store: &'a dyn RecordStore,
    pub token: &'a str,
}

/// Fetch one page and persist every post on it.
///
/// A failing listing fetch, comment fetch or store access aborts the batch;
/// posts already written stay written.
pub fn process_batch(
    ctx: &BatchContext<'_>,
    container: &str,
    batch_size: usize,
    after: Option<&str>,
) -> Result<BatchOutcome> {
    let page = ctx.api.fetch_listing(ctx.token, container, batch_size, after)?;
    let mut outcome = BatchOutcome {
        fetched: page.posts.len(),
        after: page.after.clone(),
        oldest_created_utc: page.posts.last().map(|p| p.created_utc).unwrap_or(0),
        ..Default::default()
    };

    for data in page.posts {
        process_post(ctx, container, data, &mut outcome)?;
    }
    Ok(outcome)
}

fn process_post(
    ctx: &BatchContext<'_>,
    container: &str,
    data: PostData,
    outcome: &mut BatchOutcome,
) -> Result<()> {
    let title: String = data.title.chars().take(50).collect();
    tracing::debug!(post_id = %data.id, "processing {}...", title);

    let prior = ctx.store.read(&PostKey::of(container, &data))?;
    if prior.is_some() {
        tracing::debug!(post_id = %data.id, "found persisted comments data for post");
    }

    let comments = match plan_comments(prior, data.num_comments) {
        CommentPlan::Reuse(stored) => {
            tracing::debug!(
                post_id = %data.id,
                "skipping comment fetching because the number of comments hasn't changed since last fetch"
            );
            outcome.reused += 1;
            stored
        }
        CommentPlan::Empty => {
            tracing::debug!(post_id = %data.id, "skipping comments fetch - post has no comments");
            Vec::new()
        }
        CommentPlan::Fetch => {
            tracing::info!("Fetching {} comments for {}...", data.num_comments, title);
            let listing = ctx.api.fetch_comments(ctx.token, container, &data.id)?;
            outcome.comment_fetches += 1;
            let (flat, stats) = flatten_comments(&listing);
            if stats.placeholders > 0 || stats.unrecognized > 0 {
                tracing::debug!(
                    post_id = %data.id,
                    kept = stats.comments,
                    placeholders = stats.placeholders,
                    hidden_replies = stats.hidden_replies,
                    unrecognized = stats.unrecognized,
                    "comment tree flattened with omissions"
                );
            }
            flat
        }
    };

    ctx.store.write(&Post::from_listing(container, data, comments))
}
