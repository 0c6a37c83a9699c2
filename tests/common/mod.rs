#![allow(dead_code)]

use rdump::{
    CommentListing, CredentialProvider, ListingPage, PostData, RedditApi, Result, ScrapeError,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Posts this far in the past are always newer than a 7-day floor.
pub const HOUR: i64 = 60 * 60;
pub const DAY: i64 = 24 * HOUR;

pub fn now() -> i64 {
    rdump::now_epoch()
}

/// Listing payload for one post, shaped like the `/new` endpoint's `data`.
pub fn post_json(id: &str, created_utc: i64, num_comments: u64) -> Value {
    json!({
        "id": id,
        "name": format!("t3_{id}"),
        "subreddit": "rust",
        "author": "ferris",
        "title": format!("Post {id} with a title long enough to be truncated in the debug log"),
        "selftext": "hello",
        "selftext_html": "<div>hello</div>",
        "score": 10,
        "ups": 10,
        "downs": 0,
        "upvote_ratio": 0.97,
        "created_utc": created_utc as f64,
        "num_comments": num_comments,
        "permalink": format!("/r/rust/comments/{id}/"),
        "url": format!("https://www.reddit.com/r/rust/comments/{id}/"),
        "stickied": false
    })
}

pub fn post(id: &str, created_utc: i64, num_comments: u64) -> PostData {
    serde_json::from_value(post_json(id, created_utc, num_comments)).unwrap()
}

/// `t1` node. `replies` empty renders as `""`, the way Reddit sends leaf comments.
pub fn comment(id: &str, parent_id: &str, depth: u32, replies: Vec<Value>) -> Value {
    let replies = if replies.is_empty() {
        json!("")
    } else {
        json!({ "kind": "Listing", "data": { "after": null, "before": null, "children": replies } })
    };
    json!({
        "kind": "t1",
        "data": {
            "id": id,
            "name": format!("t1_{id}"),
            "author": format!("user_{id}"),
            "body": format!("body of {id}"),
            "body_html": format!("<p>body of {id}</p>"),
            "created_utc": 1_700_000_000.0,
            "score": 1,
            "parent_id": parent_id,
            "depth": depth,
            "replies": replies
        }
    })
}

pub fn more(parent_id: &str, count: u64) -> Value {
    json!({
        "kind": "more",
        "data": { "id": "m", "name": "t1_m", "parent_id": parent_id, "count": count, "depth": 1, "children": ["x", "y"] }
    })
}

pub fn comment_listing(children: Vec<Value>) -> CommentListing {
    serde_json::from_value(json!({
        "kind": "Listing",
        "data": { "after": null, "before": null, "children": children }
    }))
    .unwrap()
}

/// Scripted listing/comment API keyed by request cursor, recording every call.
#[derive(Default)]
pub struct FakeApi {
    pages: HashMap<Option<String>, ListingPage>,
    comments: HashMap<String, CommentListing>,
    failing_posts: HashSet<String>,
    failing_containers: HashSet<String>,
    pub listing_calls: RefCell<Vec<(String, usize, Option<String>)>>,
    pub comment_calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page served when the request carries `cursor`.
    pub fn page(mut self, cursor: Option<&str>, posts: Vec<PostData>, after: Option<&str>) -> Self {
        let page = ListingPage { posts, after: after.map(String::from), has_more: after.is_some() };
        self.pages.insert(cursor.map(String::from), page);
        self
    }

    pub fn comments(mut self, post_id: &str, listing: CommentListing) -> Self {
        self.comments.insert(post_id.to_string(), listing);
        self
    }

    pub fn fail_comments_for(mut self, post_id: &str) -> Self {
        self.failing_posts.insert(post_id.to_string());
        self
    }

    pub fn fail_listing_for(mut self, container: &str) -> Self {
        self.failing_containers.insert(container.to_string());
        self
    }

    pub fn comment_fetches(&self) -> usize {
        self.comment_calls.borrow().len()
    }

    pub fn listing_fetches(&self) -> usize {
        self.listing_calls.borrow().len()
    }

    pub fn requested_limits(&self) -> Vec<usize> {
        self.listing_calls.borrow().iter().map(|(_, l, _)| *l).collect()
    }

    pub fn reset_calls(&self) {
        self.listing_calls.borrow_mut().clear();
        self.comment_calls.borrow_mut().clear();
    }
}

impl RedditApi for FakeApi {
    fn fetch_listing(&self, _token: &str, container: &str, limit: usize, after: Option<&str>) -> Result<ListingPage> {
        self.listing_calls
            .borrow_mut()
            .push((container.to_string(), limit, after.map(String::from)));
        if self.failing_containers.contains(container) {
            return Err(ScrapeError::Status {
                context: format!("failed to fetch posts for r/{container}"),
                status: 403,
                reason: "Forbidden".into(),
            });
        }
        let mut page = self.pages.get(&after.map(String::from)).cloned().unwrap_or_default();
        page.posts.truncate(limit);
        Ok(page)
    }

    fn fetch_comments(&self, _token: &str, _container: &str, post_id: &str) -> Result<CommentListing> {
        self.comment_calls.borrow_mut().push(post_id.to_string());
        if self.failing_posts.contains(post_id) {
            return Err(ScrapeError::Status {
                context: format!("failed to fetch comments for post {post_id}"),
                status: 500,
                reason: "Internal Server Error".into(),
            });
        }
        Ok(self.comments.get(post_id).cloned().unwrap_or_else(|| comment_listing(vec![])))
    }
}

/// Hands out a fixed token and counts exchanges.
#[derive(Default)]
pub struct FakeCredentials {
    pub calls: RefCell<usize>,
    pub missing: bool,
}

impl FakeCredentials {
    pub fn missing() -> Self {
        Self { calls: RefCell::new(0), missing: true }
    }
}

impl CredentialProvider for FakeCredentials {
    fn access_token(&self) -> Result<String> {
        *self.calls.borrow_mut() += 1;
        if self.missing {
            return Err(ScrapeError::config("missing REDDIT_CLIENT_ID or REDDIT_SECRET environment variables"));
        }
        Ok("token".to_string())
    }
}
