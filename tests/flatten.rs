#[path = "common/mod.rs"]
mod common;

use common::*;
use rdump::{flatten_comments, CommentListing, CommentNode, FlattenStats, Replies};
use serde_json::json;

/// Tree used by most tests:
///   a
///   ├── b
///   │   └── c
///   └── d
///   e
///   (more: 7 hidden replies under e)
fn sample_tree() -> CommentListing {
    comment_listing(vec![
        comment(
            "a",
            "t3_p",
            0,
            vec![
                comment("b", "t1_a", 1, vec![comment("c", "t1_b", 2, vec![])]),
                comment("d", "t1_a", 1, vec![]),
            ],
        ),
        comment("e", "t3_p", 0, vec![more("t1_e", 7)]),
    ])
}

/// Pre-order: every parent strictly precedes its descendants, siblings keep API order.
#[test]
fn flattens_in_pre_order() {
    let (flat, _) = flatten_comments(&sample_tree());
    let ids: Vec<&str> = flat.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);

    let depths: Vec<u32> = flat.iter().map(|c| c.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1, 0]);

    for c in &flat {
        if let Some(parent) = c.parent_id.strip_prefix("t1_") {
            let ppos = flat.iter().position(|x| x.id == parent).expect("parent kept");
            let cpos = flat.iter().position(|x| x.id == c.id).unwrap();
            assert!(ppos < cpos, "{} must come after its parent {}", c.id, parent);
        }
    }
}

/// `more` placeholders are counted, never emitted and never expanded.
#[test]
fn placeholders_are_counted_not_emitted() {
    let (flat, stats) = flatten_comments(&sample_tree());
    assert_eq!(flat.len(), 5, "output length = number of real comment nodes");
    assert_eq!(
        stats,
        FlattenStats { comments: 5, placeholders: 1, hidden_replies: 7, unrecognized: 0 }
    );
    assert!(flat.iter().all(|c| c.id != "m"));
}

/// Unknown kinds and `t1` nodes whose payload does not decode are dropped;
/// their siblings still come through.
#[test]
fn unrecognized_nodes_degrade_to_omission() {
    let listing = comment_listing(vec![
        json!({ "kind": "t3", "data": { "id": "weird" } }),
        comment("ok1", "t3_p", 0, vec![]),
        json!({ "kind": "t1", "data": { "body": "no id here" } }),
        json!({ "no_kind": true }),
        comment("ok2", "t3_p", 0, vec![]),
    ]);

    let (flat, stats) = flatten_comments(&listing);
    let ids: Vec<&str> = flat.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["ok1", "ok2"]);
    assert_eq!(stats.unrecognized, 3);
    assert_eq!(stats.placeholders, 0);
}

/// Stored comments are flat: no `replies`, no rendered HTML, other fields kept.
#[test]
fn flattened_comment_drops_replies_and_html() {
    let (flat, _) = flatten_comments(&sample_tree());
    let a = serde_json::to_value(&flat[0]).unwrap();
    assert!(a.get("replies").is_none());
    assert!(a.get("body_html").is_none());
    assert_eq!(a["body"], "body of a");
    assert_eq!(a["author"], "user_a");
    assert_eq!(a["created_utc"], 1_700_000_000i64);
}

#[test]
fn empty_listing_flattens_to_nothing() {
    let (flat, stats) = flatten_comments(&comment_listing(vec![]));
    assert!(flat.is_empty());
    assert_eq!(stats, FlattenStats::default());
}

/// A listing that only holds a placeholder (a thread where Reddit truncated
/// everything) yields no comments.
#[test]
fn placeholder_only_listing() {
    let (flat, stats) = flatten_comments(&comment_listing(vec![more("t3_p", 250)]));
    assert!(flat.is_empty());
    assert_eq!(stats.hidden_replies, 250);
}

/// A `replies` object that is not a listing is counted as unrecognized; the
/// comment itself and its siblings still come through.
#[test]
fn malformed_replies_are_counted() {
    let mut a = comment("a", "t3_p", 0, vec![]);
    a["data"]["replies"] = json!({ "kind": "Listing", "children": [comment("b", "t1_a", 1, vec![])] });
    let listing = comment_listing(vec![a, comment("c", "t3_p", 0, vec![])]);

    let (flat, stats) = flatten_comments(&listing);
    let ids: Vec<&str> = flat.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(
        stats,
        FlattenStats { comments: 2, placeholders: 0, hidden_replies: 0, unrecognized: 1 }
    );
}

#[test]
fn replies_decode_by_shape() {
    let decode = |replies: serde_json::Value| {
        let mut node = comment("a", "t3_p", 0, vec![]);
        node["data"]["replies"] = replies;
        match serde_json::from_value::<CommentNode>(node).unwrap() {
            CommentNode::Comment(c) => c.replies,
            other => panic!("expected a comment, got {other:?}"),
        }
    };

    assert!(decode(json!("")).is_none());
    assert!(decode(json!(null)).is_none());
    assert!(matches!(
        decode(json!({ "kind": "Listing", "data": { "children": [] } })),
        Some(Replies::Listing(_))
    ));
    assert!(matches!(decode(json!({ "data": { "children": {} } })), Some(Replies::Malformed(_))));
    assert!(matches!(decode(json!({ "data": { "after": 3 } })), Some(Replies::Malformed(_))));
}

/// A `t1` payload that fails to decode keeps its envelope and the reason.
#[test]
fn unrecognized_node_carries_decode_error() {
    let node: CommentNode =
        serde_json::from_value(json!({ "kind": "t1", "data": { "body": "no id here" } })).unwrap();
    match node {
        CommentNode::Unrecognized(raw) => {
            assert_eq!(raw["kind"], "t1");
            assert!(raw["error"].as_str().unwrap().contains("id"));
        }
        other => panic!("expected unrecognized, got {other:?}"),
    }
}
