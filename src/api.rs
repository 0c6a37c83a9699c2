//! Reddit API access: OAuth token exchange, the `new` listing and comment trees.
//!
//! The core only depends on the [`CredentialProvider`] and [`RedditApi`] traits;
//! [`RedditClient`] is the blocking `reqwest` implementation.

use crate::error::{Result, ScrapeError};
use crate::models::{CommentListing, ListingPage, PostListing};
use crate::throttle::Throttle;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
pub const DEFAULT_USER_AGENT: &str = "rdump/0.1 by rdump";

pub const CLIENT_ID_ENV: &str = "REDDIT_CLIENT_ID";
pub const SECRET_ENV: &str = "REDDIT_SECRET";

/// Yields a bearer token valid for the duration of one scrape.
pub trait CredentialProvider {
    fn access_token(&self) -> Result<String>;
}

/// Listing and comment-tree fetches.
pub trait RedditApi {
    fn fetch_listing(
        &self,
        token: &str,
        container: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<ListingPage>;

    fn fetch_comments(&self, token: &str, container: &str, post_id: &str) -> Result<CommentListing>;
}

/// Application credentials for the client-credentials grant.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), secret: secret.into() }
    }

    /// Read `REDDIT_CLIENT_ID` / `REDDIT_SECRET`; empty values count as missing.
    pub fn from_env() -> Result<Self> {
        let get = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        match (get(CLIENT_ID_ENV), get(SECRET_ENV)) {
            (Some(id), Some(secret)) => Ok(Self::new(id, secret)),
            _ => Err(ScrapeError::config(format!(
                "missing {CLIENT_ID_ENV} or {SECRET_ENV} environment variables"
            ))),
        }
    }
}

/// Query knobs for the comments endpoint.
#[derive(Clone, Debug)]
pub struct CommentQuery {
    pub limit: u32,
    pub sort: String,
    /// Clamped to 1..=10 when set.
    pub depth: Option<u32>,
}

impl Default for CommentQuery {
    fn default() -> Self {
        Self { limit: 500, sort: "confidence".to_string(), depth: None }
    }
}

impl CommentQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut p = vec![
            ("raw_json", "1".to_string()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.clone()),
        ];
        if let Some(d) = self.depth {
            p.push(("depth", d.clamp(1, 10).to_string()));
        }
        p
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Blocking HTTP client for the Reddit OAuth API.
#[derive(Clone, Debug)]
pub struct RedditClient {
    http: Client,
    credentials: Credentials,
    throttle: Throttle,
    auth_base: String,
    api_base: String,
    comment_query: CommentQuery,
}

impl RedditClient {
    pub fn new(credentials: Credentials, user_agent: &str, throttle: Throttle) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScrapeError::upstream("build http client", e))?;
        Ok(Self {
            http,
            credentials,
            throttle,
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            comment_query: CommentQuery::default(),
        })
    }

    /// Point token exchange and API calls at other hosts (e.g. a local stub).
    pub fn with_base_urls(mut self, auth_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        self.auth_base = auth_base.into().trim_end_matches('/').to_string();
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_comment_query(mut self, q: CommentQuery) -> Self {
        self.comment_query = q;
        self
    }

    pub fn listing_url(&self, container: &str) -> String {
        format!("{}/r/{}/new.json", self.api_base, container)
    }

    pub fn comments_url(&self, container: &str, post_id: &str) -> String {
        format!("{}/r/{}/comments/{}.json", self.api_base, container, post_id)
    }
}

fn check_status(resp: Response, context: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(ScrapeError::Status {
        context: context.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
    })
}

impl CredentialProvider for RedditClient {
    fn access_token(&self) -> Result<String> {
        let context = "failed to get authorization token";
        let resp = self
            .http
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .map_err(|e| ScrapeError::upstream(context, e))?;
        let token: TokenResponse = check_status(resp, context)?
            .json()
            .map_err(|e| ScrapeError::upstream(context, e))?;
        Ok(token.access_token)
    }
}

impl RedditApi for RedditClient {
    fn fetch_listing(
        &self,
        token: &str,
        container: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<ListingPage> {
        let context = format!("failed to fetch posts for r/{container}");
        let mut params = vec![("raw_json", "1".to_string()), ("limit", limit.to_string())];
        if let Some(a) = after {
            params.push(("after", a.to_string()));
        }

        self.throttle.gate();
        let resp = self
            .http
            .get(self.listing_url(container))
            .bearer_auth(token)
            .query(&params)
            .send()
            .map_err(|e| ScrapeError::upstream(context.clone(), e))?;
        let listing: PostListing = check_status(resp, &context)?
            .json()
            .map_err(|e| ScrapeError::upstream(context.clone(), e))?;
        Ok(listing.into())
    }

    fn fetch_comments(&self, token: &str, container: &str, post_id: &str) -> Result<CommentListing> {
        let context = format!("failed to fetch comments for post {post_id}");

        self.throttle.gate();
        let resp = self
            .http
            .get(self.comments_url(container, post_id))
            .bearer_auth(token)
            .query(&self.comment_query.params())
            .send()
            .map_err(|e| ScrapeError::upstream(context.clone(), e))?;
        let body: Value = check_status(resp, &context)?
            .json()
            .map_err(|e| ScrapeError::upstream(context.clone(), e))?;
        parse_comments_response(body).map_err(|e| ScrapeError::upstream(context, e))
    }
}

/// The comments endpoint answers `[post_listing, comment_listing]`.
pub fn parse_comments_response(body: Value) -> anyhow::Result<CommentListing> {
    let second = match body {
        Value::Array(mut parts) if parts.len() >= 2 => parts.swap_remove(1),
        other => anyhow::bail!("expected a two-element array, got {}", kind_of(&other)),
    };
    Ok(serde_json::from_value(second)?)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array of the wrong length",
        Value::Object(_) => "object",
    }
}
