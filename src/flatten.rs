//! Comment-tree flattening: nested `t1`/`more` nodes into one pre-order list.
//!
//! `more` placeholders are never expanded, so a flattened thread can be missing
//! replies Reddit chose to truncate. We only count them.

use crate::models::{Comment, CommentListing, CommentNode, Replies};

/// Counters gathered while walking a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub comments: usize,
    pub placeholders: usize,
    /// Sum of the reply counts the skipped placeholders advertised.
    pub hidden_replies: u64,
    pub unrecognized: usize,
}

/// Flatten the comment listing of one post.
pub fn flatten_comments(listing: &CommentListing) -> (Vec<Comment>, FlattenStats) {
    flatten_nodes(&listing.data.children)
}

/// Flatten a sibling list: each comment is followed by its own replies before
/// the next sibling.
pub fn flatten_nodes(nodes: &[CommentNode]) -> (Vec<Comment>, FlattenStats) {
    let mut out = Vec::new();
    let mut stats = FlattenStats::default();
    traverse(nodes, &mut out, &mut stats);
    (out, stats)
}

fn traverse(nodes: &[CommentNode], out: &mut Vec<Comment>, stats: &mut FlattenStats) {
    for node in nodes {
        match node {
            CommentNode::Comment(c) => {
                out.push(Comment::from_node(c));
                stats.comments += 1;
                match &c.replies {
                    Some(Replies::Listing(l)) => traverse(&l.data.children, out, stats),
                    Some(Replies::Malformed(raw)) => {
                        tracing::debug!(parent = %c.id, replies = %raw, "skipping malformed replies");
                        stats.unrecognized += 1;
                    }
                    None => {}
                }
            }
            CommentNode::More(m) => {
                tracing::debug!(
                    parent_id = %m.parent_id,
                    count = m.count,
                    "skipping \"more\" placeholder"
                );
                stats.placeholders += 1;
                stats.hidden_replies += m.count;
            }
            CommentNode::Unrecognized(raw) => {
                tracing::debug!(node = %raw, "skipping unprocessable comment node");
                stats.unrecognized += 1;
            }
        }
    }
}
