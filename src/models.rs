//! Wire types for the listing/comment endpoints and the records we persist.
//!
//! Wire types mirror the `{kind, data}` envelopes Reddit returns. Fields we do not
//! model explicitly are kept in `extra` so a stored record carries everything the
//! API sent, minus pre-rendered HTML and nested replies.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fields stripped from every persisted record.
pub const STRIPPED_FIELDS: &[&str] = &["selftext_html", "body_html"];

// ----------------------------- Listing ------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

/// `/r/<sub>/new` response.
pub type PostListing = Listing<Thing<PostData>>;

/// Second element of the `/comments/<id>` response.
pub type CommentListing = Listing<CommentNode>;

/// One page of a listing as the batch processor sees it.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub posts: Vec<PostData>,
    pub after: Option<String>,
    pub has_more: bool,
}

impl From<PostListing> for ListingPage {
    fn from(l: PostListing) -> Self {
        let has_more = l.data.after.is_some();
        Self {
            posts: l.data.children.into_iter().map(|t| t.data).collect(),
            after: l.data.after,
            has_more,
        }
    }
}

// ----------------------------- Posts ------------------------------------

/// A post as returned inside a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub downs: i64,
    #[serde(default)]
    pub upvote_ratio: f64,
    #[serde(deserialize_with = "de_epoch_secs")]
    pub created_utc: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted post record. The key is `(container, created_utc, id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Listing this post was harvested from.
    pub container: String,
    #[serde(flatten)]
    pub data: PostData,
    #[serde(default)]
    pub flattened_comments: Vec<Comment>,
}

impl Post {
    /// Build a record from listing data, dropping derivative fields.
    pub fn from_listing(container: &str, mut data: PostData, comments: Vec<Comment>) -> Self {
        strip_derived(&mut data.extra);
        Self { container: container.to_string(), data, flattened_comments: comments }
    }

    pub fn key(&self) -> PostKey {
        PostKey::new(&self.container, self.data.created_utc, &self.data.id)
    }
}

/// Identity of a stored post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostKey {
    pub container: String,
    pub created_utc: i64,
    pub post_id: String,
}

impl PostKey {
    pub fn new(container: &str, created_utc: i64, post_id: &str) -> Self {
        Self { container: container.to_string(), created_utc, post_id: post_id.to_string() }
    }

    pub fn of(container: &str, data: &PostData) -> Self {
        Self::new(container, data.created_utc, &data.id)
    }
}

// ----------------------------- Comments ------------------------------------

/// Payload of a `t1` node.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, deserialize_with = "de_epoch_secs")]
    pub created_utc: i64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub depth: u32,
    /// `None` when Reddit sends `""` (no replies).
    #[serde(default, deserialize_with = "de_replies")]
    pub replies: Option<Replies>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `replies` object of a `t1` node.
#[derive(Debug, Clone)]
pub enum Replies {
    Listing(CommentListing),
    /// An object that is not a `{kind, data: {children}}` listing.
    Malformed(Value),
}

/// Payload of a `more` placeholder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoreData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub children: Vec<String>,
}

/// A node of the comment tree, decoded by its `kind` tag.
///
/// Decoding never fails: unknown tags and payloads that do not fit their tag
/// become `Unrecognized`, carrying the envelope and the decode error.
#[derive(Debug, Clone)]
pub enum CommentNode {
    Comment(Box<CommentData>),
    More(MoreData),
    Unrecognized(Value),
}

impl<'de> Deserialize<'de> for CommentNode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let mut map = match Value::deserialize(d)? {
            Value::Object(map) => map,
            other => return Ok(CommentNode::Unrecognized(other)),
        };
        let kind = map.get("kind").and_then(Value::as_str).unwrap_or("").to_string();
        let node = match kind.as_str() {
            "t1" => {
                let data = map.remove("data").unwrap_or(Value::Null);
                match serde_json::from_value::<CommentData>(data) {
                    Ok(c) => CommentNode::Comment(Box::new(c)),
                    Err(e) => unrecognized(map, e),
                }
            }
            "more" => {
                let data = map.remove("data").unwrap_or(Value::Null);
                match serde_json::from_value::<MoreData>(data) {
                    Ok(m) => CommentNode::More(m),
                    Err(e) => unrecognized(map, e),
                }
            }
            _ => CommentNode::Unrecognized(Value::Object(map)),
        };
        Ok(node)
    }
}

/// The payload was consumed by the failed decode; keep the envelope and the reason.
fn unrecognized(mut envelope: Map<String, Value>, err: serde_json::Error) -> CommentNode {
    envelope.insert("error".to_string(), Value::String(err.to_string()));
    CommentNode::Unrecognized(Value::Object(envelope))
}

/// Persisted comment: flat, no replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_utc: i64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    /// Copy the scalar fields out of a tree node, leaving its replies behind.
    pub fn from_node(c: &CommentData) -> Self {
        let mut extra = c.extra.clone();
        strip_derived(&mut extra);
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            author: c.author.clone(),
            body: c.body.clone(),
            created_utc: c.created_utc,
            score: c.score,
            parent_id: c.parent_id.clone(),
            depth: c.depth,
            extra,
        }
    }
}

// ----------------------------- Helpers ------------------------------------

fn strip_derived(extra: &mut Map<String, Value>) {
    for k in STRIPPED_FIELDS {
        extra.remove(*k);
    }
}

/// Reddit sends epoch seconds as floats (`1700000000.0`); store whole seconds.
fn de_epoch_secs<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let v = Value::deserialize(d)?;
    match &v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {n}"))),
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("invalid timestamp: {other}"))),
    }
}

fn de_replies<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Replies>, D::Error> {
    let v = Value::deserialize(d)?;
    if !v.is_object() {
        return Ok(None);
    }
    if !is_listing_shape(&v) {
        return Ok(Some(Replies::Malformed(v)));
    }
    let replies = match serde_json::from_value::<CommentListing>(v) {
        Ok(listing) => Replies::Listing(listing),
        Err(e) => Replies::Malformed(Value::String(e.to_string())),
    };
    Ok(Some(replies))
}

/// Same checks the [`Listing`] decode makes, without consuming the value.
fn is_listing_shape(v: &Value) -> bool {
    let opt_str = |k: &str, m: &Map<String, Value>| {
        m.get(k).map_or(true, |x| x.is_null() || x.is_string())
    };
    let Some(obj) = v.as_object() else { return false };
    let Some(data) = obj.get("data").and_then(Value::as_object) else { return false };
    obj.get("kind").map_or(true, Value::is_string)
        && opt_str("after", data)
        && opt_str("before", data)
        && data.get("children").map_or(true, Value::is_array)
}
