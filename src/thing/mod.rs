//! Decoding of raw API things into comments and stubs.

mod tree;

pub use tree::build_replies_tree;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::MoreResult;
use crate::listing::CommentListing;
use crate::session::Session;
use crate::stub::Stub;

pub const COMMENT_PREFIX: &str = "t1_";

/// `t1_<id>`, leaving ids that already carry the prefix untouched.
pub fn comment_fullname(id: &str) -> String {
    if id.starts_with(COMMENT_PREFIX) {
        id.to_string()
    } else {
        format!("{COMMENT_PREFIX}{id}")
    }
}

/// Raw `t1` payload. Unknown fields are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentData {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    #[serde(default)]
    pub link_id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_fullname: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub depth: Option<u32>,
    /// Either `""` or a nested `Listing`.
    #[serde(default)]
    pub replies: serde_json::Value,
}

/// Raw `more` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoreData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub parent_id: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub children: Vec<String>,
}

/// A decoded `{kind, data}` envelope of a kind this crate understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Thing {
    Comment(CommentData),
    More(MoreData),
}

#[derive(Deserialize)]
struct Envelope {
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl Thing {
    /// Returns `Ok(None)` for kinds other than `t1` and `more`.
    pub fn from_value(value: &serde_json::Value) -> MoreResult<Option<Thing>> {
        let envelope = Envelope::deserialize(value)?;
        let thing = match envelope.kind.as_str() {
            "t1" => Some(Thing::Comment(CommentData::deserialize(envelope.data)?)),
            "more" => Some(Thing::More(MoreData::deserialize(envelope.data)?)),
            _ => None,
        };
        Ok(thing)
    }

    pub fn decode_all(values: &[serde_json::Value]) -> MoreResult<Vec<Thing>> {
        let mut things = Vec::with_capacity(values.len());
        for value in values {
            if let Some(thing) = Thing::from_value(value)? {
                things.push(thing);
            }
        }
        Ok(things)
    }
}

/// A hydrated comment with its (possibly partial) replies.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub link_id: String,
    pub author: Option<String>,
    pub author_fullname: Option<String>,
    pub body: String,
    pub score: i64,
    pub created_utc: f64,
    pub depth: Option<u32>,
    pub replies: CommentListing,
}

impl Comment {
    pub fn from_data(data: CommentData, session: &Arc<Session>) -> MoreResult<Comment> {
        Comment::from_data_in(data, session, None)
    }

    /// Like [`Comment::from_data`], with `thread` standing in for a missing
    /// `link_id`. Replies, and the stub trailing them, inherit the result.
    pub fn from_data_in(
        mut data: CommentData,
        session: &Arc<Session>,
        thread: Option<&str>,
    ) -> MoreResult<Comment> {
        if data.link_id.is_empty() {
            if let Some(thread) = thread {
                data.link_id = thread.to_string();
            }
        }
        let thread = Some(data.link_id.as_str()).filter(|l| !l.is_empty());
        let replies = CommentListing::from_replies_in(&data.replies, session, thread)?;
        Ok(Comment {
            id: data.id,
            name: data.name,
            parent_id: data.parent_id,
            link_id: data.link_id,
            author: data.author,
            author_fullname: data.author_fullname,
            body: data.body,
            score: data.score,
            created_utc: data.created_utc,
            depth: data.depth,
            replies,
        })
    }

    /// Number of comments in this subtree, this one included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .replies
            .comments
            .iter()
            .map(Comment::subtree_len)
            .sum::<usize>()
    }
}

/// One entry of an expansion result.
#[derive(Debug, Clone)]
pub enum Node {
    Content(Comment),
    Pending(Stub),
}

impl Node {
    pub fn from_thing(thing: Thing, session: &Arc<Session>) -> MoreResult<Node> {
        Node::from_thing_in(thing, session, None)
    }

    /// Decodes `thing` as part of thread `thread`: stubs are addressed to it
    /// and comments lacking a `link_id` take it.
    pub fn from_thing_in(
        thing: Thing,
        session: &Arc<Session>,
        thread: Option<&str>,
    ) -> MoreResult<Node> {
        Ok(match thing {
            Thing::Comment(data) => Node::Content(Comment::from_data_in(data, session, thread)?),
            Thing::More(data) => {
                let mut stub = Stub::from_data(data, session.clone());
                stub.link_id = thread.map(str::to_string);
                Node::Pending(stub)
            }
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Content(comment) => &comment.name,
            Node::Pending(stub) => &stub.name,
        }
    }

    pub fn parent_id(&self) -> &str {
        match self {
            Node::Content(comment) => &comment.parent_id,
            Node::Pending(stub) => &stub.parent_id,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Node::Content(comment) => Some(comment),
            Node::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Node::Pending(_))
    }
}
